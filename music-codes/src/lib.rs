//! # music-codes - Music industry identifiers
//!
//! Parsing, validation, formatting and sequence navigation for the codes
//! used to register recordings, works and labels:
//!
//! ```text
//! ┌──────────────┬──────────────────────┬─────────────────────────────┐
//! │ Type         │ Example              │ Sequence                    │
//! ├──────────────┼──────────────────────┼─────────────────────────────┤
//! │ IsrcCode     │ GB-A1B-11-00036      │ id 1..=99999, year rollover │
//! │ IswcCode     │ T-034.524.680-1      │ id 1..=999999999            │
//! │ LabelCode    │ LC-1234              │ id 1..10^digits             │
//! └──────────────┴──────────────────────┴─────────────────────────────┘
//! ```
//!
//! Every code type is a plain value. Parsing never fails: unrecognized
//! input gives an invalid code, and `validate()` tells why. The strict
//! `FromStr` implementations and serde support reject invalid codes.
//!
//! ## Quick Start
//!
//! ```rust
//! use music_codes::{IsrcCode, IswcCode, LabelCode};
//!
//! let mut isrc = IsrcCode::parse("ISRC gb-a1b-11-00036");
//! assert!(isrc.next(IsrcCode::MIN_ID, false));
//! assert_eq!(isrc.format(false, true), "ISRC GBA1B1100037");
//!
//! let iswc = IswcCode::from_id("034.524.680");
//! assert_eq!(iswc.to_string(), "T-034.524.680-1");
//!
//! let label: LabelCode = "LC-1234".parse().unwrap();
//! assert_eq!(label.id(), Some(1234));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Validation error types
//! - [`isrc`] - Recording codes and the ISRC id policy
//! - [`iswc`] - Work codes and the check digit
//! - [`label_code`] - Label codes
//! - [`code`] - Shared trait, kind detection, [`AnyCode`]
//! - [`report`] - JSON summary of a code
//! - [`config`] - Environment settings for the CLI

// Core modules
pub mod error;
pub mod code;

// Identifier types
pub mod isrc;
pub mod iswc;
pub mod label_code;

// Output and settings
pub mod report;
pub mod config;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CodeError, CodeKind, Result};

// =============================================================================
// Re-exports - Codes
// =============================================================================

pub use code::{detect, AnyCode, Direction, MusicCode};
pub use isrc::{IsrcCode, IsrcPolicy};
pub use iswc::{check_digit_for, IswcCode};
pub use label_code::LabelCode;

// =============================================================================
// Re-exports - Report and settings
// =============================================================================

pub use config::Settings;
pub use report::CodeReport;
