// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

// arch/arm/tools/syscall.tbl (EABI)
syscall_table! {
    SYS_read = 3,
    SYS_write = 4,
    SYS_close = 6,
    SYS_lseek = 19,
    SYS_getpid = 20,
    SYS_getuid32 = 199,
    SYS_openat = 322,
    SYS_mkdirat = 323,
    SYS_fstatat64 = 327,
    SYS_unlinkat = 328,
}
