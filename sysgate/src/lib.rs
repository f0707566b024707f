// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Raw syscalls from user space, without going through libc's wrappers.

pub mod files;
pub mod ops;
pub mod sinks;
pub mod trampoline;

pub use ops::RawFs;

/// Tag carried by every line the wrapper layer logs.
pub const LOG_TAG: &str = "syscall-wrapper";

#[cfg(test)]
mod tests;
