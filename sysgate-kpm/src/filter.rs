// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::sync::atomic::{AtomicU32, Ordering};

use sysgate_common::{Uid, UID_ANY};

/// The one uid audit output is restricted to, or [`UID_ANY`] for everyone.
///
/// Read on every intercepted call, written rarely; a stale read during a write is fine.
#[derive(Debug)]
pub struct UidFilter(AtomicU32);

impl UidFilter {
    pub const fn new() -> Self {
        UidFilter(AtomicU32::new(UID_ANY))
    }

    pub fn set(&self, uid: Uid) {
        self.0.store(uid, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.set(UID_ANY);
    }

    /// The current target, `None` when everyone is admitted.
    pub fn target(&self) -> Option<Uid> {
        match self.0.load(Ordering::Relaxed) {
            UID_ANY => None,
            uid => Some(uid),
        }
    }

    pub fn admits(&self, uid: Uid) -> bool {
        self.target().map_or(true, |target| target == uid)
    }
}

impl Default for UidFilter {
    fn default() -> Self {
        Self::new()
    }
}
