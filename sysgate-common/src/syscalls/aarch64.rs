// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

// include/uapi/asm-generic/unistd.h
syscall_table! {
    SYS_mkdirat = 34,
    SYS_unlinkat = 35,
    SYS_openat = 56,
    SYS_close = 57,
    SYS_lseek = 62,
    SYS_read = 63,
    SYS_write = 64,
    SYS_newfstatat = 79,
    SYS_getpid = 172,
    SYS_getuid = 174,
}
