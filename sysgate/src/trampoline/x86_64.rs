// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::arch::asm;

use sysgate_common::SyscallArgs;

use super::Abi;

pub struct X86_64;

impl Abi for X86_64 {
    const NAME: &'static str = "x86_64";
    const NR_REGISTER: &'static str = "rax";
    // The fourth argument moves from rcx to r10: `syscall` overwrites rcx with the return address.
    const ARG_REGISTERS: [&'static str; 6] = ["rdi", "rsi", "rdx", "r10", "r8", "r9"];
    const RET_REGISTER: &'static str = "rax";
    const TRAP: &'static str = "syscall";

    #[inline(always)]
    unsafe fn trap(nr: i64, args: &SyscallArgs) -> i64 {
        let ret: i64;
        asm!(
            "syscall",
            inlateout("rax") nr => ret,
            in("rdi") args[0],
            in("rsi") args[1],
            in("rdx") args[2],
            in("r10") args[3],
            in("r8") args[4],
            in("r9") args[5],
            lateout("rcx") _,
            lateout("r11") _,
            options(nostack),
        );
        ret
    }
}
