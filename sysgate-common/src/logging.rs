// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Tagged, leveled log lines shared by the user-space wrappers and the kernel module.
//!
//! A [`Logger`] is built once when the process (or module) starts, with the sink chosen at that
//! point, and is cloned into every component that needs to emit lines. Sinks render
//! [`LogLine`]s as `[LEVEL][TAG] message` and must never fail loudly: a line that cannot be
//! written is dropped.

use alloc::{
    string::{String, ToString as _},
    sync::Arc,
    vec::Vec,
};
use core::fmt;

pub use log::Level;

/// A single record, borrowed for the duration of [`LogSink::emit`].
pub struct LogLine<'a> {
    pub level: Level,
    pub tag: &'a str,
    pub message: fmt::Arguments<'a>,
}

impl fmt::Display for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}] {}", self.level, self.tag, self.message)
    }
}

pub trait LogSink: Send + Sync {
    fn emit(&self, line: &LogLine<'_>);
}

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    tag: &'static str,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>, tag: &'static str) -> Self {
        Logger { sink, tag }
    }

    /// A logger writing into a fresh [`CaptureSink`], which is returned alongside it.
    pub fn capture(tag: &'static str) -> (Self, Arc<CaptureSink>) {
        let sink = Arc::new(CaptureSink::default());
        (Logger::new(sink.clone(), tag), sink)
    }

    /// Same sink, different tag.
    pub fn with_tag(&self, tag: &'static str) -> Self {
        Logger {
            sink: self.sink.clone(),
            tag,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn log(&self, level: Level, message: fmt::Arguments<'_>) {
        self.sink.emit(&LogLine {
            level,
            tag: self.tag,
            message,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("tag", &self.tag).finish()
    }
}

#[macro_export]
macro_rules! logd {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! logi {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! logw {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! loge {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Error, format_args!($($arg)*))
    };
}

/// Keeps every rendered line in memory.
#[derive(Default)]
pub struct CaptureSink {
    lines: spin::Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.lines.lock())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for CaptureSink {
    fn emit(&self, line: &LogLine<'_>) {
        let rendered = line.to_string();
        self.lines.lock().push(rendered);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec};

    use super::*;

    #[test]
    fn renders_level_and_tag() {
        let (logger, sink) = Logger::capture("syscall-wrapper");

        logi!(logger, "open success: {}, fd: {}", "/tmp/x", 3);
        loge!(logger, "Failed to open source file: {}", "/nope");
        logd!(logger.with_tag("other"), "debug {}", 1);
        logw!(logger, "careful");

        assert_eq!(
            sink.take(),
            vec![
                String::from("[INFO][syscall-wrapper] open success: /tmp/x, fd: 3"),
                String::from("[ERROR][syscall-wrapper] Failed to open source file: /nope"),
                String::from("[DEBUG][other] debug 1"),
                String::from("[WARN][syscall-wrapper] careful"),
            ]
        );
        assert!(sink.is_empty());
    }
}
