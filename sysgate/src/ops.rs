// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![allow(non_upper_case_globals)]

//! POSIX-like file primitives issued through the trampoline.
//!
//! Each primitive is exactly one syscall. A negative raw result is logged with its errno and
//! collapsed to `-1`; anything else is logged and handed back as is.

use std::ffi::CStr;

use sysgate_common::{
    kernel_types::Stat,
    logging::Logger,
    logi, logw,
    syscalls::{SYS_close, SYS_lseek, SYS_mkdirat, SYS_openat, SYS_read, SYS_unlinkat, SYS_write},
};

use crate::trampoline::{syscall1, syscall3, syscall4};

#[cfg(not(arm))]
use sysgate_common::syscalls::SYS_newfstatat as SYS_stat_at;
#[cfg(arm)]
use sysgate_common::syscalls::SYS_fstatat64 as SYS_stat_at;

const AT_FDCWD: usize = libc::AT_FDCWD as isize as usize;

pub struct RawFs {
    log: Logger,
}

impl RawFs {
    pub fn new(log: Logger) -> Self {
        RawFs { log }
    }

    pub fn logger(&self) -> &Logger {
        &self.log
    }

    /// `openat(AT_FDCWD, path, flags, mode)`; the descriptor, or -1.
    pub fn open(&self, path: &CStr, flags: i32, mode: u32) -> i32 {
        let result = unsafe {
            syscall4(
                SYS_openat,
                AT_FDCWD,
                path.as_ptr() as usize,
                flags as usize,
                mode as usize,
            )
        };
        if result < 0 {
            logw!(self.log, "open failed: {}, error: {}", path.to_string_lossy(), -result);
            return -1;
        }
        logi!(self.log, "open success: {}, fd: {}", path.to_string_lossy(), result);
        result as i32
    }

    /// Reads up to `buf.len()` bytes; the byte count, or -1.
    pub fn read(&self, fd: i32, buf: &mut [u8]) -> isize {
        let result =
            unsafe { syscall3(SYS_read, fd as usize, buf.as_mut_ptr() as usize, buf.len()) };
        if result < 0 {
            logw!(self.log, "read failed: fd={}, error: {}", fd, -result);
            return -1;
        }
        logi!(self.log, "read success: fd={}, bytes: {}", fd, result);
        result as isize
    }

    /// Writes up to `buf.len()` bytes; the byte count, or -1. Short writes are not retried.
    pub fn write(&self, fd: i32, buf: &[u8]) -> isize {
        let result = unsafe { syscall3(SYS_write, fd as usize, buf.as_ptr() as usize, buf.len()) };
        if result < 0 {
            logw!(self.log, "write failed: fd={}, error: {}", fd, -result);
            return -1;
        }
        logi!(self.log, "write success: fd={}, bytes: {}", fd, result);
        result as isize
    }

    pub fn close(&self, fd: i32) -> i32 {
        let result = unsafe { syscall1(SYS_close, fd as usize) };
        if result < 0 {
            logw!(self.log, "close failed: fd={}, error: {}", fd, -result);
            return -1;
        }
        logi!(self.log, "close success: fd={}", fd);
        result as i32
    }

    /// Repositions `fd`; the resulting offset, or -1.
    ///
    /// On 32-bit ARM the offset travels in a single register, so it must fit in 32 bits.
    pub fn lseek(&self, fd: i32, offset: i64, whence: i32) -> i64 {
        let result = unsafe {
            syscall3(
                SYS_lseek,
                fd as usize,
                offset as isize as usize,
                whence as usize,
            )
        };
        if result < 0 {
            logw!(self.log, "lseek failed: fd={}, error: {}", fd, -result);
            return -1;
        }
        logi!(self.log, "lseek success: fd={}, offset: {}", fd, result);
        result
    }

    /// Fills `statbuf` for `path`, following symlinks; 0, or -1.
    pub fn stat(&self, path: &CStr, statbuf: &mut Stat) -> i32 {
        let result = unsafe {
            syscall4(
                SYS_stat_at,
                AT_FDCWD,
                path.as_ptr() as usize,
                statbuf as *mut Stat as usize,
                0,
            )
        };
        if result < 0 {
            logw!(self.log, "stat failed: {}, error: {}", path.to_string_lossy(), -result);
            return -1;
        }
        logi!(self.log, "stat success: {}", path.to_string_lossy());
        result as i32
    }

    pub fn mkdir(&self, path: &CStr, mode: u32) -> i32 {
        let result =
            unsafe { syscall3(SYS_mkdirat, AT_FDCWD, path.as_ptr() as usize, mode as usize) };
        if result < 0 {
            logw!(self.log, "mkdir failed: {}, error: {}", path.to_string_lossy(), -result);
            return -1;
        }
        logi!(self.log, "mkdir success: {}", path.to_string_lossy());
        result as i32
    }

    pub fn unlink(&self, path: &CStr) -> i32 {
        let result = unsafe { syscall3(SYS_unlinkat, AT_FDCWD, path.as_ptr() as usize, 0) };
        if result < 0 {
            logw!(self.log, "unlink failed: {}, error: {}", path.to_string_lossy(), -result);
            return -1;
        }
        logi!(self.log, "unlink success: {}", path.to_string_lossy());
        result as i32
    }
}
