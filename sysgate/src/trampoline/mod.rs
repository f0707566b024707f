// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Direct kernel entry.
//!
//! Everything above this module is architecture-agnostic: it hands a syscall number and a
//! [`SyscallArgs`] block to [`raw_syscall`] and gets the kernel's raw return value back, a
//! negated errno on failure. The per-architecture [`Abi`] implementations own the register
//! placement and the trap instruction; nothing here retries or translates errors.

use sysgate_common::{logi, logging::Logger, pack_args, SyscallArgs, SYSCALL_ARGS_COUNT};

#[cfg(aarch64)]
mod aarch64;
#[cfg(aarch64)]
pub use aarch64::Aarch64 as NativeAbi;

#[cfg(arm)]
mod arm;
#[cfg(arm)]
pub use arm::Arm as NativeAbi;

#[cfg(x86_64)]
mod x86_64;
#[cfg(x86_64)]
pub use x86_64::X86_64 as NativeAbi;

#[cfg(not(any(aarch64, arm, x86_64)))]
compile_error!("Unsupported architecture. Only aarch64, arm and x86_64 are supported.");

/// A kernel syscall calling convention.
pub trait Abi {
    /// Human readable architecture name.
    const NAME: &'static str;
    /// Register carrying the syscall number.
    const NR_REGISTER: &'static str;
    /// Registers carrying arguments one to six, in order.
    const ARG_REGISTERS: [&'static str; SYSCALL_ARGS_COUNT];
    /// Register the kernel leaves the result in.
    const RET_REGISTER: &'static str;
    /// The trap instruction.
    const TRAP: &'static str;

    /// Enters the kernel with `nr` and `args` laid out per this convention.
    ///
    /// # Safety
    /// The kernel will act on the arguments as the syscall defines them: pointers must be valid
    /// for whatever the syscall reads or writes through them, and syscalls that alter the
    /// process (exit, memory mappings, signal state) take effect without Rust knowing.
    unsafe fn trap(nr: i64, args: &SyscallArgs) -> i64;
}

/// Issues syscall `nr` with `args` on the build target's native convention.
///
/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn raw_syscall(nr: i64, args: SyscallArgs) -> i64 {
    NativeAbi::trap(nr, &args)
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall0(nr: i64) -> i64 {
    raw_syscall(nr, [0; SYSCALL_ARGS_COUNT])
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall1(nr: i64, a1: usize) -> i64 {
    raw_syscall(nr, pack_args(&[a1]))
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall2(nr: i64, a1: usize, a2: usize) -> i64 {
    raw_syscall(nr, pack_args(&[a1, a2]))
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall3(nr: i64, a1: usize, a2: usize, a3: usize) -> i64 {
    raw_syscall(nr, pack_args(&[a1, a2, a3]))
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall4(nr: i64, a1: usize, a2: usize, a3: usize, a4: usize) -> i64 {
    raw_syscall(nr, pack_args(&[a1, a2, a3, a4]))
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall5(nr: i64, a1: usize, a2: usize, a3: usize, a4: usize, a5: usize) -> i64 {
    raw_syscall(nr, pack_args(&[a1, a2, a3, a4, a5]))
}

/// # Safety
/// See [`Abi::trap`].
#[inline]
pub unsafe fn syscall6(
    nr: i64,
    a1: usize,
    a2: usize,
    a3: usize,
    a4: usize,
    a5: usize,
    a6: usize,
) -> i64 {
    raw_syscall(nr, [a1, a2, a3, a4, a5, a6])
}

pub fn architecture_info(logger: &Logger) {
    logi!(logger, "Architecture: {}", NativeAbi::NAME);
    logi!(logger, "Pointer size: {} bytes", size_of::<*const u8>());
    logi!(logger, "Long size: {} bytes", size_of::<libc::c_long>());
    logi!(
        logger,
        "Syscall convention: nr in {}, args in {}, `{}`, result in {}",
        NativeAbi::NR_REGISTER,
        NativeAbi::ARG_REGISTERS.join(", "),
        NativeAbi::TRAP,
        NativeAbi::RET_REGISTER
    );
}
