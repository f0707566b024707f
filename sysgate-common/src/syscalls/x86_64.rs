// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

// arch/x86/entry/syscalls/syscall_64.tbl
syscall_table! {
    SYS_read = 0,
    SYS_write = 1,
    SYS_close = 3,
    SYS_lseek = 8,
    SYS_getpid = 39,
    SYS_getuid = 102,
    SYS_openat = 257,
    SYS_mkdirat = 258,
    SYS_newfstatat = 262,
    SYS_unlinkat = 263,
}
