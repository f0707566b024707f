// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::ffi::CStr;

use sysgate_common::{kernel_types::Stat, loge, logi};

use crate::ops::RawFs;

pub const COPY_CHUNK_SIZE: usize = 4096;

/// Mode given to files created by [`RawFs::copy_file`].
pub const COPY_FILE_MODE: u32 = 0o644;

impl RawFs {
    /// Copies `src` over `dst`, creating or truncating it. 0 on success, -1 on any failure.
    ///
    /// Every chunk read has to be written back in full; a short write counts as a failure.
    /// Both descriptors are closed on every path out of here.
    pub fn copy_file(&self, src: &CStr, dst: &CStr) -> i32 {
        let log = self.logger();
        let mut buffer = [0u8; COPY_CHUNK_SIZE];

        let src_fd = self.open(src, libc::O_RDONLY, 0);
        if src_fd < 0 {
            loge!(log, "Failed to open source file: {}", src.to_string_lossy());
            return -1;
        }

        let dst_fd = self.open(
            dst,
            libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC,
            COPY_FILE_MODE,
        );
        if dst_fd < 0 {
            loge!(log, "Failed to open destination file: {}", dst.to_string_lossy());
            self.close(src_fd);
            return -1;
        }

        let last_read = loop {
            let bytes_read = self.read(src_fd, &mut buffer);
            if bytes_read <= 0 {
                break bytes_read;
            }

            if self.write(dst_fd, &buffer[..bytes_read as usize]) != bytes_read {
                loge!(log, "Failed to write to destination file: {}", dst.to_string_lossy());
                self.close(src_fd);
                self.close(dst_fd);
                return -1;
            }
        };

        self.close(src_fd);
        self.close(dst_fd);

        if last_read < 0 {
            loge!(log, "Failed to read from source file: {}", src.to_string_lossy());
            return -1;
        }

        logi!(
            log,
            "File copied successfully: {} -> {}",
            src.to_string_lossy(),
            dst.to_string_lossy()
        );
        0
    }

    pub fn file_exists(&self, path: &CStr) -> bool {
        let mut statbuf = Stat::default();
        self.stat(path, &mut statbuf) == 0
    }

    /// Size in bytes, or 0 when `path` cannot be stat'ed.
    pub fn file_size(&self, path: &CStr) -> u64 {
        let mut statbuf = Stat::default();
        if self.stat(path, &mut statbuf) == 0 {
            return statbuf.st_size as u64;
        }
        0
    }
}
