// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{ffi::CString, os::unix::ffi::OsStrExt as _, path::PathBuf};

mod files;

/// A directory under the system temp dir, unique to the test and the process, removed on drop.
pub struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    pub fn new(test: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("sysgate-{}-{test}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Scratch { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn c_path(&self, name: &str) -> CString {
        CString::new(self.path(name).as_os_str().as_bytes()).unwrap()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Runs `$body` with a [`crate::RawFs`] logging into a capture sink and a fresh scratch
/// directory.
#[macro_export]
macro_rules! fs_test {
    ($name:ident, |$fs:ident, $log:ident, $scratch:ident| $body:block) => {
        #[test]
        fn $name() {
            let (logger, $log) = ::sysgate_common::logging::Logger::capture($crate::LOG_TAG);
            let $fs = $crate::RawFs::new(logger);
            let $scratch = $crate::tests::Scratch::new(stringify!($name));
            $body
        }
    };
}
