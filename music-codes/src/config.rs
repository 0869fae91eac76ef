//! Runtime settings for the command line front end.
//!
//! Read from the environment (a `.env` file is loaded first if present):
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `MUSIC_CODES_ZERO_IDS_ALLOWED` | `false` | Accept ISRC id `00000` |
//! | `MUSIC_CODES_LOG` | `warn` | Log filter when `RUST_LOG` is unset |

use serde::{Deserialize, Serialize};
use std::env;

use crate::isrc::IsrcPolicy;

pub const ZERO_IDS_ALLOWED_VAR: &str = "MUSIC_CODES_ZERO_IDS_ALLOWED";
pub const LOG_FILTER_VAR: &str = "MUSIC_CODES_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Accept ISRC id 0 as valid.
    pub zero_ids_allowed: bool,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Variables that were set but not understood, as `NAME=value`. Reported
    /// once logging is up.
    #[serde(skip)]
    pub ignored: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zero_ids_allowed: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            ignored: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut ignored = Vec::new();

        let zero_ids_allowed = match lookup(ZERO_IDS_ALLOWED_VAR) {
            Some(v) => parse_flag(&v).unwrap_or_else(|| {
                ignored.push(format!("{}={}", ZERO_IDS_ALLOWED_VAR, v));
                defaults.zero_ids_allowed
            }),
            None => defaults.zero_ids_allowed,
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_filter);

        Self {
            zero_ids_allowed,
            log_filter,
            ignored,
        }
    }

    /// ISRC validation policy these settings describe.
    pub fn isrc_policy(&self) -> IsrcPolicy {
        IsrcPolicy {
            zero_ids_allowed: self.zero_ids_allowed,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
