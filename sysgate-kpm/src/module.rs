// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Module lifecycle: what the host calls on load, on unload and on control requests.

use alloc::sync::Arc;

use spin::Mutex;
use sysgate_common::{
    loge, logi,
    logging::Logger,
    syscalls::{syscall_name_from_nr, SYS_read, SYS_write},
};

use crate::{
    audit::{fd_io_hook, AuditContext, AuditHook, FD_IO_ARGS},
    config::ModuleConfig,
    control::ControlChannel,
    cred::{CredentialOffsets, CredentialResolver, TaskSource, UidSource},
    dispatch::SyscallTable,
    filter::UidFilter,
    hook::HookManager,
};

pub const MODULE_TAG: &str = "sysgate-kpm";

const HOOK_COUNT: usize = 2;

/// Installed in this order, removed in reverse.
const HOOKED_SYSCALLS: [i64; HOOK_COUNT] = [SYS_read, SYS_write];

pub struct SysgateModule<T> {
    hooks: HookManager,
    tasks: T,
    default_offsets: CredentialOffsets,
    filter: Arc<UidFilter>,
    control: ControlChannel,
    installed: Mutex<heapless::Vec<AuditHook, HOOK_COUNT>>,
    logger: Logger,
}

impl<T: TaskSource + Clone + 'static> SysgateModule<T> {
    /// # Safety
    /// `default_offsets`, and any offsets later passed to [`SysgateModule::init`], must match
    /// the layout of the task and credential structures `tasks` hands out.
    pub unsafe fn new(
        table: Arc<SyscallTable>,
        tasks: T,
        default_offsets: CredentialOffsets,
        logger: Logger,
    ) -> Self {
        let logger = logger.with_tag(MODULE_TAG);
        let filter = Arc::new(UidFilter::new());

        SysgateModule {
            hooks: HookManager::new(table),
            tasks,
            default_offsets,
            control: ControlChannel::new(filter.clone(), logger.clone()),
            filter,
            installed: Mutex::new(heapless::Vec::new()),
            logger,
        }
    }

    pub fn filter(&self) -> &UidFilter {
        &self.filter
    }

    pub fn hooks(&self) -> &HookManager {
        &self.hooks
    }

    /// Hooks read and write. Always 0: a hook that fails to install is logged and skipped.
    pub fn init(&self, args: &str, event: &str, _reserved: usize) -> i64 {
        let config = match ModuleConfig::parse(args, self.default_offsets) {
            Ok(config) => config,
            Err(e) => {
                if let Err(defaults) = self.default_offsets.validate() {
                    loge!(
                        self.logger,
                        "bad module arguments ({e}) and unusable default offsets ({defaults}), not hooking"
                    );
                    return 0;
                }
                loge!(self.logger, "bad module arguments ({e}), using defaults");
                ModuleConfig::new(self.default_offsets)
            }
        };

        // SAFETY: offsets are either the defaults or come from the loader, both vouched for by
        // whoever called `new`.
        let resolver =
            Arc::new(unsafe { CredentialResolver::new(self.tasks.clone(), config.offsets) });
        logi!(
            self.logger,
            "init, event: {event}, args: {args}, uid: {}",
            resolver.current_uid()
        );

        if let Some(uid) = config.target_uid {
            self.filter.set(uid);
            logi!(self.logger, "target uid {uid}");
        }

        let audit = Arc::new(AuditContext::new(
            self.filter.clone(),
            resolver,
            self.logger.clone(),
        ));

        let mut installed = self.installed.lock();
        for nr in HOOKED_SYSCALLS {
            let name = syscall_name_from_nr(nr).unwrap_or("?");
            let hook = fd_io_hook(&audit, nr, name);

            match self
                .hooks
                .install(nr, FD_IO_ARGS, hook.before.clone(), hook.after.clone())
            {
                Ok(()) => {
                    logi!(self.logger, "Hooked {name}");
                    if installed.push(hook).is_err() {
                        loge!(self.logger, "lost track of the {name} hook");
                    }
                }
                Err(e) => loge!(self.logger, "Failed to hook {name}: {e}"),
            }
        }

        0
    }

    /// Unhooks everything `init` hooked, last first. Always 0.
    pub fn exit(&self, _reserved: usize) -> i64 {
        logi!(self.logger, "exit");

        let mut installed = self.installed.lock();
        let mut stuck = heapless::Vec::<AuditHook, HOOK_COUNT>::new();
        while let Some(hook) = installed.pop() {
            match self.hooks.uninstall(hook.nr, &hook.before, &hook.after) {
                Ok(()) => logi!(self.logger, "Unhooked {}", hook.name),
                Err(e) => {
                    loge!(self.logger, "Failed to unhook {}: {e}", hook.name);
                    // Kept so a later exit can retry with the same callbacks.
                    if let Err(hook) = stuck.push(hook) {
                        loge!(self.logger, "lost track of the {} hook", hook.name);
                    }
                }
            }
        }
        while let Some(hook) = stuck.pop() {
            if let Err(hook) = installed.push(hook) {
                loge!(self.logger, "lost track of the {} hook", hook.name);
            }
        }

        0
    }

    pub fn ctl0(&self, args: &[u8], out: &mut [u8]) -> i64 {
        self.control.ctl0(args, out)
    }

    pub fn ctl1(&self, a1: usize, a2: usize, a3: usize) -> i64 {
        self.control.ctl1(a1, a2, a3)
    }
}
