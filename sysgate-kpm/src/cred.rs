// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Reading the calling thread's uid out of live task state.
//!
//! The task structure holds a pointer to the thread's credentials, which hold the uid. Neither
//! layout is known at build time: both byte offsets are supplied per target kernel through
//! [`CredentialOffsets`].

use core::{mem::size_of, ptr};

use sysgate_common::{Uid, UID_ANY};

use crate::config::ConfigError;

/// Where the current task structure lives.
///
/// # Safety
/// [`TaskSource::current_task`] must return either null or a pointer to the calling thread's
/// task structure, valid for reads for as long as the calling thread runs.
pub unsafe trait TaskSource: Send + Sync {
    fn current_task(&self) -> *const u8;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialOffsets {
    /// From the task structure to its credential pointer.
    pub task_cred: usize,
    /// From the credential structure to the uid.
    pub cred_uid: usize,
}

impl CredentialOffsets {
    pub const MAX_TASK_CRED: usize = 0x4000;
    pub const MAX_CRED_UID: usize = 0x100;

    /// Rejects offsets that cannot belong to any real kernel layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.task_cred % size_of::<usize>() != 0 || self.task_cred > Self::MAX_TASK_CRED {
            return Err(ConfigError::ImplausibleOffset {
                key: "task_cred_offset",
                value: self.task_cred,
            });
        }
        if self.cred_uid % size_of::<Uid>() != 0 || self.cred_uid > Self::MAX_CRED_UID {
            return Err(ConfigError::ImplausibleOffset {
                key: "cred_uid_offset",
                value: self.cred_uid,
            });
        }
        Ok(())
    }
}

/// Anything that can tell who the calling thread is.
pub trait UidSource: Send + Sync {
    /// The caller's uid, or [`UID_ANY`] when it cannot be determined.
    fn current_uid(&self) -> Uid;
}

pub struct CredentialResolver<T> {
    tasks: T,
    offsets: CredentialOffsets,
}

impl<T: TaskSource> CredentialResolver<T> {
    /// # Safety
    /// `offsets` must describe the task and credential structures `tasks` hands out: a pointer
    /// at `task_cred` inside the task, and a uid at `cred_uid` inside the credentials.
    pub unsafe fn new(tasks: T, offsets: CredentialOffsets) -> Self {
        CredentialResolver { tasks, offsets }
    }

    pub fn offsets(&self) -> CredentialOffsets {
        self.offsets
    }

    /// Never writes, never fails: a null task or credential pointer gives [`UID_ANY`].
    pub fn resolve(&self) -> Uid {
        let task = self.tasks.current_task();
        if task.is_null() {
            return UID_ANY;
        }

        // SAFETY: the task is valid per TaskSource, the offset per CredentialResolver::new.
        let cred = unsafe {
            ptr::read_volatile(task.add(self.offsets.task_cred).cast::<*const u8>())
        };
        if cred.is_null() {
            return UID_ANY;
        }

        // SAFETY: as above.
        unsafe { ptr::read_volatile(cred.add(self.offsets.cred_uid).cast::<Uid>()) }
    }
}

impl<T: TaskSource> UidSource for CredentialResolver<T> {
    fn current_uid(&self) -> Uid {
        self.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run_as, run_without_cred, run_without_task, ThreadTasks};

    fn resolver() -> CredentialResolver<ThreadTasks> {
        unsafe { CredentialResolver::new(ThreadTasks, ThreadTasks::offsets()) }
    }

    #[test]
    fn follows_both_offsets() {
        let resolver = resolver();
        assert_eq!(run_as(10_057, || resolver.resolve()), 10_057);
        assert_eq!(run_as(0, || resolver.current_uid()), 0);
    }

    #[test]
    fn null_pointers_give_any() {
        let resolver = resolver();
        assert_eq!(run_without_task(|| resolver.resolve()), UID_ANY);
        assert_eq!(run_without_cred(|| resolver.resolve()), UID_ANY);
    }

    #[test]
    fn offset_plausibility() {
        let good = ThreadTasks::offsets();
        assert_eq!(good.validate(), Ok(()));

        let misaligned = CredentialOffsets {
            task_cred: good.task_cred + 1,
            ..good
        };
        assert!(matches!(
            misaligned.validate(),
            Err(ConfigError::ImplausibleOffset {
                key: "task_cred_offset",
                ..
            })
        ));

        let huge = CredentialOffsets {
            cred_uid: 0x104,
            ..good
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::ImplausibleOffset {
                key: "cred_uid_offset",
                value: 0x104
            })
        ));
    }
}
