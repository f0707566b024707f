// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Kernel-side syscall auditing: a before/after hook pair on `read` and `write`, gated by a
//! runtime-settable uid filter.
//!
//! The crate models the kernel's syscall dispatch table explicitly ([`SyscallTable`]) so the
//! hook manager can be driven by a host shim in kernel context, or on the host in tests.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod audit;
pub mod config;
pub mod control;
pub mod cred;
pub mod dispatch;
pub mod filter;
pub mod hook;
pub mod module;

#[cfg(test)]
mod testing;

pub use dispatch::{Handler, SyscallFn, SyscallTable};
pub use hook::{HookError, HookFn, HookManager, InterceptedFrame};
pub use module::{SysgateModule, MODULE_TAG};
