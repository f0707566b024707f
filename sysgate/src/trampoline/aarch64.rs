// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::arch::asm;

use sysgate_common::SyscallArgs;

use super::Abi;

pub struct Aarch64;

impl Abi for Aarch64 {
    const NAME: &'static str = "ARM64 (AArch64)";
    const NR_REGISTER: &'static str = "x8";
    const ARG_REGISTERS: [&'static str; 6] = ["x0", "x1", "x2", "x3", "x4", "x5"];
    const RET_REGISTER: &'static str = "x0";
    const TRAP: &'static str = "svc #0";

    #[inline(always)]
    unsafe fn trap(nr: i64, args: &SyscallArgs) -> i64 {
        let ret: i64;
        asm!(
            "svc #0",
            in("x8") nr,
            inlateout("x0") args[0] as i64 => ret,
            in("x1") args[1],
            in("x2") args[2],
            in("x3") args[3],
            in("x4") args[4],
            in("x5") args[5],
            options(nostack),
        );
        ret
    }
}
