// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Before/after interception of dispatch table slots.
//!
//! Installing a hook swaps the slot's native handler for a [`HookShim`] that brackets it with
//! the two callbacks. Uninstalling swaps the native handler back and then waits until no call is
//! still running through the shim, so callbacks never run after [`HookManager::uninstall`]
//! returns.

use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};
use core::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use spin::Mutex;
use sysgate_common::{SyscallArgs, ENOSYS, SYSCALL_ARGS_COUNT};

use crate::dispatch::{Handler, SyscallFn, SyscallTable};

const ENOENT: i64 = 2;
const EBUSY: i64 = 16;
const EEXIST: i64 = 17;
const EINVAL: i64 = 22;

pub type HookFn = Arc<dyn Fn(&InterceptedFrame<'_>) + Send + Sync>;

/// The arguments of one in-flight call, and its result once the original handler returned.
pub struct InterceptedFrame<'a> {
    nr: i64,
    argc: usize,
    args: &'a SyscallArgs,
    ret: Option<i64>,
}

impl<'a> InterceptedFrame<'a> {
    pub fn new(nr: i64, argc: usize, args: &'a SyscallArgs) -> Self {
        InterceptedFrame {
            nr,
            argc: argc.min(SYSCALL_ARGS_COUNT),
            args,
            ret: None,
        }
    }

    pub fn nr(&self) -> i64 {
        self.nr
    }

    pub fn argc(&self) -> usize {
        self.argc
    }

    /// Argument `index`, if the hook declared at least `index + 1` arguments.
    pub fn arg(&self, index: usize) -> Option<usize> {
        if index < self.argc {
            Some(self.args[index])
        } else {
            None
        }
    }

    /// The original handler's result. Only set for the after callback.
    pub fn ret(&self) -> Option<i64> {
        self.ret
    }
}

/// Replacement handler for a hooked slot.
pub struct HookShim {
    nr: i64,
    argc: usize,
    original: SyscallFn,
    before: HookFn,
    after: HookFn,
    in_flight: AtomicUsize,
}

impl HookShim {
    pub fn nr(&self) -> i64 {
        self.nr
    }

    pub fn original(&self) -> SyscallFn {
        self.original
    }

    /// Calls currently between entering the shim and returning from it.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Must be called while the slot's read lock is held.
    pub(crate) fn enter(self: &Arc<Self>) -> ShimCall {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        ShimCall { shim: self.clone() }
    }

    fn call(&self, args: &SyscallArgs) -> i64 {
        let mut frame = InterceptedFrame::new(self.nr, self.argc, args);
        (self.before)(&frame);

        let ret = (self.original)(args);

        frame.ret = Some(ret);
        (self.after)(&frame);

        ret
    }

    /// Spins until every call that entered the shim has left it.
    ///
    /// Deadlocks if called from one of the shim's own callbacks.
    fn quiesce(&self) {
        while self.in_flight() != 0 {
            core::hint::spin_loop();
        }
    }
}

pub(crate) struct ShimCall {
    shim: Arc<HookShim>,
}

impl ShimCall {
    pub(crate) fn run(self, args: &SyscallArgs) -> i64 {
        self.shim.call(args)
    }
}

impl Drop for ShimCall {
    fn drop(&mut self) {
        self.shim.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookError {
    /// The number has no slot in the table.
    NoSuchSyscall(i64),
    /// More arguments declared than a syscall can carry.
    BadArgCount(usize),
    AlreadyInstalled(i64),
    /// The slot is already hooked by someone else.
    SlotNotNative(i64),
    NotInstalled(i64),
    /// Uninstall was given callbacks other than the installed ones.
    CallbackMismatch(i64),
    /// The slot no longer points at our shim.
    SlotHijacked(i64),
}

impl HookError {
    /// The negated errno reported to C-style callers.
    pub fn errno(&self) -> i64 {
        match self {
            HookError::NoSuchSyscall(_) => -ENOSYS,
            HookError::BadArgCount(_) | HookError::CallbackMismatch(_) => -EINVAL,
            HookError::AlreadyInstalled(_) => -EEXIST,
            HookError::SlotNotNative(_) | HookError::SlotHijacked(_) => -EBUSY,
            HookError::NotInstalled(_) => -ENOENT,
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::NoSuchSyscall(nr) => write!(f, "no syscall {nr} in the dispatch table"),
            HookError::BadArgCount(argc) => {
                write!(f, "{argc} arguments declared, at most {SYSCALL_ARGS_COUNT} allowed")
            }
            HookError::AlreadyInstalled(nr) => write!(f, "syscall {nr} is already hooked"),
            HookError::SlotNotNative(nr) => {
                write!(f, "slot for syscall {nr} does not hold a native handler")
            }
            HookError::NotInstalled(nr) => write!(f, "syscall {nr} is not hooked"),
            HookError::CallbackMismatch(nr) => {
                write!(f, "callbacks do not match the ones hooked on syscall {nr}")
            }
            HookError::SlotHijacked(nr) => {
                write!(f, "slot for syscall {nr} was replaced behind our back")
            }
        }
    }
}

/// A hook pair and, while installed, the shim standing in the slot.
pub struct HookRegistration {
    nr: i64,
    argc: usize,
    before: HookFn,
    after: HookFn,
    shim: Option<Arc<HookShim>>,
}

impl HookRegistration {
    pub fn nr(&self) -> i64 {
        self.nr
    }

    pub fn argc(&self) -> usize {
        self.argc
    }

    pub fn is_installed(&self) -> bool {
        self.shim.is_some()
    }
}

pub struct HookManager {
    table: Arc<SyscallTable>,
    registry: Mutex<BTreeMap<i64, HookRegistration>>,
}

impl HookManager {
    pub fn new(table: Arc<SyscallTable>) -> Self {
        HookManager {
            table,
            registry: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn table(&self) -> &Arc<SyscallTable> {
        &self.table
    }

    /// Points the slot for `nr` at a shim running `before`, the native handler, then `after`.
    pub fn install(
        &self,
        nr: i64,
        argc: usize,
        before: HookFn,
        after: HookFn,
    ) -> Result<(), HookError> {
        if argc > SYSCALL_ARGS_COUNT {
            return Err(HookError::BadArgCount(argc));
        }
        let slot = self.table.slot(nr).ok_or(HookError::NoSuchSyscall(nr))?;

        let mut registry = self.registry.lock();
        if registry.get(&nr).is_some_and(HookRegistration::is_installed) {
            return Err(HookError::AlreadyInstalled(nr));
        }

        let mut handler = slot.write();
        let Handler::Native(original) = *handler else {
            return Err(HookError::SlotNotNative(nr));
        };

        let shim = Arc::new(HookShim {
            nr,
            argc,
            original,
            before: before.clone(),
            after: after.clone(),
            in_flight: AtomicUsize::new(0),
        });
        *handler = Handler::Hooked(shim.clone());
        drop(handler);

        log::debug!("hooked syscall {nr} with {argc} arguments");
        registry.insert(
            nr,
            HookRegistration {
                nr,
                argc,
                before,
                after,
                shim: Some(shim),
            },
        );

        Ok(())
    }

    /// Restores the native handler for `nr`.
    ///
    /// `before` and `after` must be the exact callbacks given to [`HookManager::install`]. Once
    /// this returns `Ok`, neither callback is running or will run again through this hook.
    pub fn uninstall(&self, nr: i64, before: &HookFn, after: &HookFn) -> Result<(), HookError> {
        let slot = self.table.slot(nr).ok_or(HookError::NoSuchSyscall(nr))?;

        let mut registry = self.registry.lock();
        let registration = registry
            .get_mut(&nr)
            .filter(|registration| registration.is_installed())
            .ok_or(HookError::NotInstalled(nr))?;

        if !Arc::ptr_eq(&registration.before, before) || !Arc::ptr_eq(&registration.after, after)
        {
            return Err(HookError::CallbackMismatch(nr));
        }

        let Some(shim) = registration.shim.clone() else {
            return Err(HookError::NotInstalled(nr));
        };

        let mut handler = slot.write();
        match &*handler {
            Handler::Hooked(current) if Arc::ptr_eq(current, &shim) => {}
            _ => return Err(HookError::SlotHijacked(nr)),
        }
        *handler = Handler::Native(shim.original);
        drop(handler);

        registration.shim = None;
        drop(registry);

        shim.quiesce();
        log::debug!("unhooked syscall {nr}");

        Ok(())
    }

    pub fn is_installed(&self, nr: i64) -> bool {
        self.registry
            .lock()
            .get(&nr)
            .is_some_and(HookRegistration::is_installed)
    }

    /// Numbers currently hooked, ascending.
    pub fn installed(&self) -> Vec<i64> {
        self.registry
            .lock()
            .values()
            .filter(|registration| registration.is_installed())
            .map(HookRegistration::nr)
            .collect()
    }
}
