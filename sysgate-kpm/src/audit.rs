// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use alloc::sync::Arc;

use sysgate_common::{logging::Logger, logi, Uid};

use crate::{
    cred::UidSource,
    filter::UidFilter,
    hook::{HookFn, InterceptedFrame},
};

/// `fd`, `buf`, `count`: the shape of read(2) and write(2).
pub const FD_IO_ARGS: usize = 3;

/// Everything an audit callback needs, shared by all hooks of a module.
pub struct AuditContext {
    filter: Arc<UidFilter>,
    uids: Arc<dyn UidSource>,
    logger: Logger,
}

impl AuditContext {
    pub fn new(filter: Arc<UidFilter>, uids: Arc<dyn UidSource>, logger: Logger) -> Self {
        AuditContext {
            filter,
            uids,
            logger,
        }
    }

    /// The caller's uid, if the filter lets this phase through.
    fn admitted(&self) -> Option<Uid> {
        let uid = self.uids.current_uid();
        self.filter.admits(uid).then_some(uid)
    }

    pub fn before_fd_io(&self, name: &str, frame: &InterceptedFrame<'_>) {
        let Some(uid) = self.admitted() else {
            return;
        };
        let (Some(fd), Some(count)) = (frame.arg(0), frame.arg(2)) else {
            return;
        };
        logi!(
            self.logger,
            "[UID {uid}] {name}(fd={}, count={count})",
            fd as isize
        );
    }

    pub fn after_fd_io(&self, name: &str, frame: &InterceptedFrame<'_>) {
        let Some(uid) = self.admitted() else {
            return;
        };
        let (Some(fd), Some(ret)) = (frame.arg(0), frame.ret()) else {
            return;
        };
        logi!(self.logger, "[UID {uid}] {name}(fd={}) ret {ret}", fd as isize);
    }
}

/// A ready-to-install callback pair. Keep it around: uninstalling needs the same callbacks.
#[derive(Clone)]
pub struct AuditHook {
    pub nr: i64,
    pub name: &'static str,
    pub before: HookFn,
    pub after: HookFn,
}

pub fn fd_io_hook(audit: &Arc<AuditContext>, nr: i64, name: &'static str) -> AuditHook {
    let before = {
        let audit = audit.clone();
        Arc::new(move |frame: &InterceptedFrame<'_>| audit.before_fd_io(name, frame)) as HookFn
    };
    let after = {
        let audit = audit.clone();
        Arc::new(move |frame: &InterceptedFrame<'_>| audit.after_fd_io(name, frame)) as HookFn
    };

    AuditHook {
        nr,
        name,
        before,
        after,
    }
}
