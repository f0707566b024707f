// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Runtime commands. `ctl0` retargets the uid filter, `ctl1` is a diagnostics hook.

use alloc::{string::String, sync::Arc};
use core::fmt;

use sysgate_common::{logging::Logger, logi, Uid};

use crate::filter::UidFilter;

pub const ECHO_PREFIX: &[u8] = b"echo: ";
/// Bytes of the command copied into the echo reply.
pub const ECHO_ARGS_MAX: usize = 48;
pub const ECHO_REPLY_MAX: usize = 64;

pub type EchoReply = heapless::Vec<u8, ECHO_REPLY_MAX>;

/// The C string in `args`: everything before the first NUL.
fn until_nul(args: &[u8]) -> &[u8] {
    match args.iter().position(|&byte| byte == 0) {
        Some(end) => &args[..end],
        None => args,
    }
}

/// `echo: ` followed by at most [`ECHO_ARGS_MAX`] bytes of `args`, stopping at a NUL.
pub fn echo_reply(args: &[u8]) -> EchoReply {
    let command = until_nul(args).iter().take(ECHO_ARGS_MAX);

    let mut reply = EchoReply::new();
    for &byte in ECHO_PREFIX.iter().chain(command) {
        if reply.push(byte).is_err() {
            break;
        }
    }
    reply
}

/// Copies as much of `reply` as fits into `out`, NUL-terminating when there is room left.
/// Returns the number of reply bytes copied.
pub fn copy_reply(reply: &[u8], out: &mut [u8]) -> usize {
    let copied = reply.len().min(out.len());
    out[..copied].copy_from_slice(&reply[..copied]);
    if let Some(terminator) = out.get_mut(copied) {
        *terminator = 0;
    }
    copied
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseUidError {
    Empty,
    InvalidDigit,
    Overflow,
}

impl fmt::Display for ParseUidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseUidError::Empty => "no digits",
            ParseUidError::InvalidDigit => "not a decimal number",
            ParseUidError::Overflow => "does not fit in 64 bits",
        })
    }
}

/// Parses an unsigned decimal, kernel style: optional `+`, one trailing newline allowed.
/// The 64-bit value is truncated to a uid.
pub fn parse_uid(args: &[u8]) -> Result<Uid, ParseUidError> {
    let digits = args.strip_prefix(b"+").unwrap_or(args);
    let digits = digits.strip_suffix(b"\n").unwrap_or(digits);
    if digits.is_empty() {
        return Err(ParseUidError::Empty);
    }

    let mut value: u64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(ParseUidError::InvalidDigit);
        }
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(u64::from(byte - b'0')))
            .ok_or(ParseUidError::Overflow)?;
    }

    Ok(value as Uid)
}

pub struct ControlChannel {
    filter: Arc<UidFilter>,
    logger: Logger,
}

impl ControlChannel {
    pub fn new(filter: Arc<UidFilter>, logger: Logger) -> Self {
        ControlChannel { filter, logger }
    }

    /// Echoes `args` into `out`, then retargets the filter if `args` is a uid. Always 0.
    pub fn ctl0(&self, args: &[u8], out: &mut [u8]) -> i64 {
        let args = until_nul(args);
        let command = String::from_utf8_lossy(args);
        logi!(self.logger, "control0, args: {command}");

        copy_reply(&echo_reply(args), out);

        match parse_uid(args) {
            Ok(uid) => {
                self.filter.set(uid);
                logi!(self.logger, "new target uid {uid}");
            }
            Err(e) => logi!(self.logger, "not a uid ({e}), target unchanged"),
        }

        0
    }

    pub fn ctl1(&self, a1: usize, a2: usize, a3: usize) -> i64 {
        logi!(
            self.logger,
            "control1, a1: {a1:x}, a2: {a2:x}, a3: {a3:x}"
        );
        0
    }
}

#[cfg(test)]
mod tests {
    use sysgate_common::UID_ANY;

    use super::*;

    fn channel() -> (ControlChannel, Arc<UidFilter>, Arc<sysgate_common::logging::CaptureSink>) {
        let (logger, sink) = Logger::capture("sysgate-kpm");
        let filter = Arc::new(UidFilter::new());
        (ControlChannel::new(filter.clone(), logger), filter, sink)
    }

    #[test]
    fn echo_is_bounded() {
        assert_eq!(echo_reply(b"1000").as_slice(), b"echo: 1000");
        assert_eq!(echo_reply(b"12\0junk").as_slice(), b"echo: 12");

        let long = [b'x'; 200];
        let reply = echo_reply(&long);
        assert_eq!(reply.len(), ECHO_PREFIX.len() + ECHO_ARGS_MAX);
        assert!(reply.len() <= ECHO_REPLY_MAX);
    }

    #[test]
    fn copy_never_overflows() {
        let mut small = [0xffu8; 4];
        assert_eq!(copy_reply(b"echo: 1000", &mut small), 4);
        assert_eq!(&small, b"echo");

        let mut exact = [0xffu8; 10];
        assert_eq!(copy_reply(b"echo: 1000", &mut exact), 10);
        assert_eq!(&exact, b"echo: 1000");

        let mut roomy = [0xffu8; 16];
        assert_eq!(copy_reply(b"echo: 1000", &mut roomy), 10);
        assert_eq!(&roomy[..11], b"echo: 1000\0");
        assert_eq!(roomy[11], 0xff);

        assert_eq!(copy_reply(b"echo: ", &mut []), 0);
    }

    #[test]
    fn uid_parsing() {
        assert_eq!(parse_uid(b"10057"), Ok(10057));
        assert_eq!(parse_uid(b"+0"), Ok(0));
        assert_eq!(parse_uid(b"1000\n"), Ok(1000));
        assert_eq!(parse_uid(b"4294967295"), Ok(UID_ANY));
        // Truncated to 32 bits.
        assert_eq!(parse_uid(b"4294967296"), Ok(0));

        assert_eq!(parse_uid(b""), Err(ParseUidError::Empty));
        assert_eq!(parse_uid(b"+\n"), Err(ParseUidError::Empty));
        assert_eq!(parse_uid(b"1000\n\n"), Err(ParseUidError::InvalidDigit));
        assert_eq!(parse_uid(b"-1"), Err(ParseUidError::InvalidDigit));
        assert_eq!(parse_uid(b" 12"), Err(ParseUidError::InvalidDigit));
        assert_eq!(parse_uid(b"0x10"), Err(ParseUidError::InvalidDigit));
        assert_eq!(
            parse_uid(b"18446744073709551616"),
            Err(ParseUidError::Overflow)
        );
    }

    #[test]
    fn ctl0_sets_target() {
        let (channel, filter, sink) = channel();
        let mut out = [0u8; 64];

        assert_eq!(channel.ctl0(b"1000", &mut out), 0);
        assert_eq!(filter.target(), Some(1000));
        assert_eq!(&out[..11], b"echo: 1000\0");
        assert_eq!(
            sink.take(),
            vec![
                String::from("[INFO][sysgate-kpm] control0, args: 1000"),
                String::from("[INFO][sysgate-kpm] new target uid 1000"),
            ]
        );
    }

    #[test]
    fn ctl0_stops_at_nul() {
        let (channel, filter, sink) = channel();
        let mut out = [0xffu8; 16];

        assert_eq!(channel.ctl0(b"1000\0", &mut out), 0);
        assert_eq!(filter.target(), Some(1000));
        assert_eq!(&out[..11], b"echo: 1000\0");

        channel.ctl0(b"2000\0junk", &mut out);
        assert_eq!(filter.target(), Some(2000));
        assert_eq!(
            sink.take(),
            vec![
                String::from("[INFO][sysgate-kpm] control0, args: 1000"),
                String::from("[INFO][sysgate-kpm] new target uid 1000"),
                String::from("[INFO][sysgate-kpm] control0, args: 2000"),
                String::from("[INFO][sysgate-kpm] new target uid 2000"),
            ]
        );
    }

    #[test]
    fn ctl0_keeps_target_on_garbage() {
        let (channel, filter, sink) = channel();
        filter.set(1000);
        let mut out = [0u8; 8];

        assert_eq!(channel.ctl0(b"everyone", &mut out), 0);
        assert_eq!(filter.target(), Some(1000));
        assert_eq!(&out, b"echo: ev");
        assert_eq!(
            sink.take().last().map(String::as_str),
            Some("[INFO][sysgate-kpm] not a uid (not a decimal number), target unchanged")
        );
    }

    #[test]
    fn ctl0_all_ones_clears_target() {
        let (channel, filter, _sink) = channel();
        filter.set(1000);

        channel.ctl0(b"4294967295", &mut [0u8; 64]);
        assert_eq!(filter.target(), None);
    }

    #[test]
    fn ctl1_logs_words() {
        let (channel, _filter, sink) = channel();

        assert_eq!(channel.ctl1(0xdead, 0, 0xbeef), 0);
        assert_eq!(
            sink.take(),
            vec![String::from(
                "[INFO][sysgate-kpm] control1, a1: dead, a2: 0, a3: beef"
            )]
        );
    }
}
