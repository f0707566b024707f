// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Module arguments, given once at load time as `key=value` pairs separated by commas or
//! whitespace:
//!
//! - `task_cred_offset`, `cred_uid_offset`: [`CredentialOffsets`], decimal or `0x` hex;
//! - `target_uid`: initial filter target, decimal.

use alloc::string::{String, ToString as _};
use core::fmt;

use sysgate_common::{Uid, UID_ANY};

use crate::cred::CredentialOffsets;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A token without `=`.
    MissingValue(String),
    InvalidValue { key: &'static str, value: String },
    ImplausibleOffset { key: &'static str, value: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingValue(token) => write!(f, "expected key=value, got {token:?}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
            ConfigError::ImplausibleOffset { key, value } => {
                write!(f, "{key} {value:#x} is misaligned or out of range")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    pub offsets: CredentialOffsets,
    /// `None` logs every caller.
    pub target_uid: Option<Uid>,
}

impl ModuleConfig {
    pub fn new(offsets: CredentialOffsets) -> Self {
        ModuleConfig {
            offsets,
            target_uid: None,
        }
    }

    /// Parses `args` on top of `defaults`. The resulting offsets are validated.
    pub fn parse(args: &str, defaults: CredentialOffsets) -> Result<Self, ConfigError> {
        let mut config = ModuleConfig::new(defaults);

        for token in args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            let Some((key, value)) = token.split_once('=') else {
                return Err(ConfigError::MissingValue(token.to_string()));
            };

            match key {
                "task_cred_offset" => {
                    config.offsets.task_cred = parse_offset("task_cred_offset", value)?
                }
                "cred_uid_offset" => {
                    config.offsets.cred_uid = parse_offset("cred_uid_offset", value)?
                }
                "target_uid" => {
                    let uid = value.parse::<Uid>().map_err(|_| invalid("target_uid", value))?;
                    config.target_uid = (uid != UID_ANY).then_some(uid);
                }
                _ => log::warn!("ignoring unknown module argument {key}"),
            }
        }

        config.offsets.validate()?;
        Ok(config)
    }
}

fn parse_offset(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => value.parse::<usize>(),
    };
    parsed.map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}
