// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Host stand-ins for kernel state: a per-thread "current task" with fake credentials, and a
//! dispatch table with trivial read/write handlers.

use std::{cell::Cell, mem::offset_of, ptr, sync::Arc};

use sysgate_common::{
    syscalls::{SYS_read, SYS_write},
    SyscallArgs, Uid,
};

use crate::{
    cred::{CredentialOffsets, TaskSource},
    dispatch::SyscallTable,
};

pub const TABLE_SIZE: usize = 512;

#[allow(dead_code)]
#[repr(C)]
struct FakeCred {
    usage: u32,
    uid: Uid,
    gid: u32,
}

#[allow(dead_code)]
#[repr(C)]
struct FakeTask {
    state: usize,
    stack: usize,
    cred: *const FakeCred,
}

thread_local! {
    static CURRENT: Cell<*const u8> = const { Cell::new(ptr::null()) };
}

/// Hands out whatever task the calling thread is currently running as.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadTasks;

impl ThreadTasks {
    pub fn offsets() -> CredentialOffsets {
        CredentialOffsets {
            task_cred: offset_of!(FakeTask, cred),
            cred_uid: offset_of!(FakeCred, uid),
        }
    }
}

// The pointer only ever refers to a task living on the calling thread's stack inside `with_task`.
unsafe impl TaskSource for ThreadTasks {
    fn current_task(&self) -> *const u8 {
        CURRENT.with(Cell::get)
    }
}

fn with_task<R>(task: *const u8, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT.replace(task);
    let result = f();
    CURRENT.set(previous);
    result
}

pub fn run_as<R>(uid: Uid, f: impl FnOnce() -> R) -> R {
    let cred = FakeCred {
        usage: 1,
        uid,
        gid: uid,
    };
    let task = FakeTask {
        state: 0,
        stack: 0,
        cred: &cred,
    };
    with_task(ptr::addr_of!(task).cast(), f)
}

pub fn run_without_task<R>(f: impl FnOnce() -> R) -> R {
    with_task(ptr::null(), f)
}

pub fn run_without_cred<R>(f: impl FnOnce() -> R) -> R {
    let task = FakeTask {
        state: 0,
        stack: 0,
        cred: ptr::null(),
    };
    with_task(ptr::addr_of!(task).cast(), f)
}

/// Pretends every byte was transferred.
fn fake_read(args: &SyscallArgs) -> i64 {
    args[2] as i64
}

/// Pretends only half the bytes made it.
fn fake_write(args: &SyscallArgs) -> i64 {
    (args[2] / 2) as i64
}

pub fn fake_kernel() -> Arc<SyscallTable> {
    let table = Arc::new(SyscallTable::new(TABLE_SIZE));
    table.register(SYS_read, fake_read);
    table.register(SYS_write, fake_write);
    table
}
