// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{
    ffi::CString,
    fmt,
    io::{self, Write as _},
    sync::Arc,
};

use clap::ValueEnum;
use sysgate_common::logging::{Level, LogLine, LogSink, Logger};

pub const LOG_MODE_ENV: &str = "SYSGATE_LOG_MODE";

/// Where log lines end up, decided once when the process starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogMode {
    /// stdout, with errors on stderr
    #[default]
    #[value(alias = "printf")]
    Stdio,
    /// logcat on Android, syslog elsewhere
    #[value(alias = "android", alias = "syslog")]
    Platform,
}

impl LogMode {
    /// The mode named by `SYSGATE_LOG_MODE`, if it is set to something we know.
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(LOG_MODE_ENV).ok()?;
        match LogMode::from_str(value.trim(), true) {
            Ok(mode) => Some(mode),
            Err(_) => {
                log::warn!("ignoring unknown {LOG_MODE_ENV} value {value:?}");
                None
            }
        }
    }

    pub fn logger(self, tag: &'static str) -> Logger {
        let sink: Arc<dyn LogSink> = match self {
            LogMode::Stdio => Arc::new(StdioSink),
            LogMode::Platform => Arc::new(PlatformSink::new(tag)),
        };
        Logger::new(sink, tag)
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMode::Stdio => f.write_str("stdio"),
            LogMode::Platform => f.write_str("platform"),
        }
    }
}

/// Errors go to stderr, everything else to stdout. Each line is flushed as it is written.
pub struct StdioSink;

impl LogSink for StdioSink {
    fn emit(&self, line: &LogLine<'_>) {
        // Nothing sensible to do about a failed log write.
        let _ = if line.level == Level::Error {
            write_line(&mut io::stderr().lock(), line)
        } else {
            write_line(&mut io::stdout().lock(), line)
        };
    }
}

fn write_line(out: &mut dyn io::Write, line: &LogLine<'_>) -> io::Result<()> {
    writeln!(out, "{line}")?;
    out.flush()
}

impl Drop for StdioSink {
    fn drop(&mut self) {
        let _ = io::stdout().flush();
    }
}

/// The system log: logcat on Android, syslog(3) everywhere else.
pub struct PlatformSink {
    ident: CString,
}

impl PlatformSink {
    pub fn new(tag: &str) -> Self {
        let ident = to_c_string(tag);

        // openlog() keeps the pointer, the CString lives as long as the sink.
        #[cfg(not(target_os = "android"))]
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER)
        };

        PlatformSink { ident }
    }
}

#[cfg(target_os = "android")]
#[link(name = "log")]
extern "C" {
    fn __android_log_write(
        prio: libc::c_int,
        tag: *const libc::c_char,
        text: *const libc::c_char,
    ) -> libc::c_int;
}

#[cfg(target_os = "android")]
impl LogSink for PlatformSink {
    fn emit(&self, line: &LogLine<'_>) {
        let priority = match line.level {
            Level::Error => 6,
            Level::Warn => 5,
            Level::Info => 4,
            Level::Debug => 3,
            Level::Trace => 2,
        };
        let tag = to_c_string(line.tag);
        let text = to_c_string(&line.message.to_string());
        unsafe { __android_log_write(priority, tag.as_ptr(), text.as_ptr()) };
    }
}

#[cfg(not(target_os = "android"))]
impl LogSink for PlatformSink {
    fn emit(&self, line: &LogLine<'_>) {
        let priority = match line.level {
            Level::Error => libc::LOG_ERR,
            Level::Warn => libc::LOG_WARNING,
            Level::Info => libc::LOG_INFO,
            Level::Debug | Level::Trace => libc::LOG_DEBUG,
        };
        let text = to_c_string(&line.to_string());
        unsafe { libc::syslog(priority, c"%s".as_ptr(), text.as_ptr()) };
    }
}

impl Drop for PlatformSink {
    fn drop(&mut self) {
        #[cfg(not(target_os = "android"))]
        unsafe {
            libc::closelog()
        };
        log::trace!("closed platform log for {:?}", self.ident);
    }
}

fn to_c_string(text: &str) -> CString {
    CString::new(text.replace('\0', "\\0")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_mode_accepts_legacy_names() {
        assert_eq!(LogMode::from_str("printf", true), Ok(LogMode::Stdio));
        assert_eq!(LogMode::from_str("android", true), Ok(LogMode::Platform));
        assert_eq!(LogMode::from_str("Platform", true), Ok(LogMode::Platform));
        assert!(LogMode::from_str("pigeon", true).is_err());
    }

    #[test]
    fn interior_nul_does_not_drop_the_line() {
        assert_eq!(to_c_string("a\0b").as_bytes(), b"a\\0b");
    }
}
