// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![no_std]

extern crate alloc;

pub mod kernel_types;
pub mod logging;
pub mod syscalls;

/// Number of word-sized arguments a syscall can carry on every supported architecture.
pub const SYSCALL_ARGS_COUNT: usize = 6;

/// Raw syscall arguments, in ABI order.
pub type SyscallArgs = [usize; SYSCALL_ARGS_COUNT];

pub type Uid = u32;

/// All-ones uid. As a filter target it means "log everyone"; as a resolved identity it means
/// the credential could not be read.
pub const UID_ANY: Uid = Uid::MAX;

/// `-ENOSYS`, returned for syscall numbers nothing is registered for.
pub const ENOSYS: i64 = 38;

/// Packs up to six arguments into a full argument array, zero-filling the rest.
pub fn pack_args(args: &[usize]) -> SyscallArgs {
    let mut packed = [0usize; SYSCALL_ARGS_COUNT];
    let count = core::cmp::min(args.len(), SYSCALL_ARGS_COUNT);
    packed[..count].copy_from_slice(&args[..count]);
    packed
}
