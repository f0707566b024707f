// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use alloc::{sync::Arc, vec::Vec};

use spin::RwLock;
use sysgate_common::{SyscallArgs, ENOSYS};

use crate::hook::HookShim;

/// A native syscall handler.
pub type SyscallFn = fn(&SyscallArgs) -> i64;

/// What a dispatch table slot points at.
#[derive(Clone)]
pub enum Handler {
    Native(SyscallFn),
    Hooked(Arc<HookShim>),
}

impl Handler {
    pub fn is_native(&self) -> bool {
        matches!(self, Handler::Native(_))
    }
}

/// Placeholder for numbers nothing is registered for.
pub fn sys_ni_syscall(_args: &SyscallArgs) -> i64 {
    -ENOSYS
}

/// The syscall dispatch table: one slot per syscall number.
///
/// Slots are swapped under their write lock. [`SyscallTable::dispatch`] only holds the read lock
/// long enough to pick the handler, and for a hooked slot to register the call with the shim,
/// so a hook is never entered once the slot has been restored.
pub struct SyscallTable {
    slots: Vec<RwLock<Handler>>,
}

impl SyscallTable {
    pub fn new(size: usize) -> Self {
        let slots = (0..size)
            .map(|_| RwLock::new(Handler::Native(sys_ni_syscall)))
            .collect();
        SyscallTable { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Installs a native handler for `nr`. Returns false if `nr` is out of range.
    pub fn register(&self, nr: i64, handler: SyscallFn) -> bool {
        match self.slot(nr) {
            Some(slot) => {
                *slot.write() = Handler::Native(handler);
                true
            }
            None => false,
        }
    }

    /// A snapshot of what `nr` currently points at.
    pub fn entry(&self, nr: i64) -> Option<Handler> {
        self.slot(nr).map(|slot| slot.read().clone())
    }

    /// Runs syscall `nr` the way the kernel entry path would.
    pub fn dispatch(&self, nr: i64, args: &SyscallArgs) -> i64 {
        let Some(slot) = self.slot(nr) else {
            return -ENOSYS;
        };

        let guard = slot.read();
        match &*guard {
            Handler::Native(handler) => {
                let handler = *handler;
                drop(guard);
                handler(args)
            }
            Handler::Hooked(shim) => {
                let call = shim.enter();
                drop(guard);
                call.run(args)
            }
        }
    }

    pub(crate) fn slot(&self, nr: i64) -> Option<&RwLock<Handler>> {
        usize::try_from(nr).ok().and_then(|index| self.slots.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(args: &SyscallArgs) -> i64 {
        args[0] as i64 + 42
    }

    #[test]
    fn unknown_numbers_are_enosys() {
        let table = SyscallTable::new(8);

        assert_eq!(table.dispatch(3, &[0; 6]), -ENOSYS);
        assert_eq!(table.dispatch(8, &[0; 6]), -ENOSYS);
        assert_eq!(table.dispatch(-1, &[0; 6]), -ENOSYS);
        assert!(table.entry(8).is_none());
    }

    #[test]
    fn registered_handler_runs() {
        let table = SyscallTable::new(8);

        assert!(table.register(5, answer));
        assert!(!table.register(9, answer));
        assert_eq!(table.dispatch(5, &[1, 0, 0, 0, 0, 0]), 43);
        assert!(table.entry(5).is_some_and(|handler| handler.is_native()));
    }
}
