// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![allow(non_upper_case_globals)]

macro_rules! syscall_table {
    ($($name:ident = $nr:literal,)*) => {
        $(pub const $name: i64 = $nr;)*

        pub const ALL_SYSCALLS: &[i64] = &[$($name),*];

        pub(crate) const SYSCALL_NAMES: &[(i64, &str)] = &[$(($nr, stringify!($name))),*];
    };
}

#[cfg(aarch64)]
mod aarch64;
#[cfg(aarch64)]
pub use aarch64::*;

#[cfg(arm)]
mod arm;
#[cfg(arm)]
pub use arm::*;

#[cfg(x86_64)]
mod x86_64;
#[cfg(x86_64)]
pub use x86_64::*;

#[cfg(not(any(aarch64, arm, x86_64)))]
compile_error!("Unsupported architecture. Currently only aarch64, arm and x86_64 are supported.");

pub fn syscall_name_from_nr(nr: i64) -> Option<&'static str> {
    SYSCALL_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == nr)
        .map(|(_, name)| name.strip_prefix("SYS_").unwrap_or(name))
}

pub fn syscall_nr_from_name(name: &str) -> Option<i64> {
    SYSCALL_NAMES
        .iter()
        .find(|(_, candidate)| candidate.strip_prefix("SYS_") == Some(name))
        .map(|(nr, _)| *nr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        assert_eq!(syscall_name_from_nr(SYS_read), Some("read"));
        assert_eq!(syscall_nr_from_name("write"), Some(SYS_write));
        assert_eq!(syscall_nr_from_name("SYS_write"), None);
        assert_eq!(syscall_name_from_nr(-1), None);
    }

    #[test]
    fn hooked_syscalls_are_known() {
        assert!(ALL_SYSCALLS.contains(&SYS_read));
        assert!(ALL_SYSCALLS.contains(&SYS_write));
    }
}
