// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::arch::asm;

use sysgate_common::SyscallArgs;

use super::Abi;

/// 32-bit ARM, EABI.
pub struct Arm;

impl Abi for Arm {
    const NAME: &'static str = "ARM32";
    const NR_REGISTER: &'static str = "r7";
    const ARG_REGISTERS: [&'static str; 6] = ["r0", "r1", "r2", "r3", "r4", "r5"];
    const RET_REGISTER: &'static str = "r0";
    const TRAP: &'static str = "svc #0";

    #[cfg(not(target_feature = "thumb-mode"))]
    #[inline(always)]
    unsafe fn trap(nr: i64, args: &SyscallArgs) -> i64 {
        let ret: isize;
        asm!(
            "svc #0",
            in("r7") nr as usize,
            inlateout("r0") args[0] as isize => ret,
            in("r1") args[1],
            in("r2") args[2],
            in("r3") args[3],
            in("r4") args[4],
            in("r5") args[5],
            options(nostack),
        );
        ret as i64
    }

    // r7 is the frame pointer in Thumb code and cannot be named as an operand, so it is
    // swapped by hand around the trap.
    #[cfg(target_feature = "thumb-mode")]
    #[inline(always)]
    unsafe fn trap(nr: i64, args: &SyscallArgs) -> i64 {
        let ret: isize;
        asm!(
            "mov {saved}, r7",
            "mov r7, {nr}",
            "svc #0",
            "mov r7, {saved}",
            nr = in(reg) nr as usize,
            saved = out(reg) _,
            inlateout("r0") args[0] as isize => ret,
            in("r1") args[1],
            in("r2") args[2],
            in("r3") args[3],
            in("r4") args[4],
            in("r5") args[5],
            options(nostack),
        );
        ret as i64
    }
}
