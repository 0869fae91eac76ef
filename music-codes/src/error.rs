//! Error types for music code parsing and validation.
//!
//! Parsing through the lenient entry points (`parse`, `load`, `from_parts`,
//! setters, navigation) never fails: a bad input leaves an invalid code.
//! The types in this module describe *why* a code is invalid, and are
//! returned by:
//!
//! - `validate()` on every code type
//! - the strict [`std::str::FromStr`] / [`TryFrom<&str>`] implementations
//! - serde deserialization
//!
//! - [`CodeKind`] - Which identifier family an error refers to
//! - [`CodeError`] - The validation failure itself

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Code Kind
// =============================================================================

/// Identifier family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// International Standard Recording Code.
    Isrc,
    /// International Standard Musical Work Code.
    Iswc,
    /// Record label code.
    #[serde(rename = "label", alias = "label_code")]
    LabelCode,
}

impl CodeKind {
    /// Short lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isrc => "isrc",
            Self::Iswc => "iswc",
            Self::LabelCode => "label",
        }
    }

    /// Parse a kind name (case insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "isrc" => Some(Self::Isrc),
            "iswc" => Some(Self::Iswc),
            "label" | "label_code" | "label-code" | "lc" => Some(Self::LabelCode),
            _ => None,
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isrc => write!(f, "ISRC"),
            Self::Iswc => write!(f, "ISWC"),
            Self::LabelCode => write!(f, "label code"),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Why a code is not valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Input does not match any grammar of the code kind.
    #[error("'{input}' is not a recognizable {kind}")]
    Unrecognized { kind: CodeKind, input: String },

    /// A field has never been set (unparsed or cleared code).
    #[error("{kind} has no {field}")]
    Missing { kind: CodeKind, field: &'static str },

    /// A text field has the wrong length or character class.
    #[error("invalid {kind} {field}: '{value}'")]
    InvalidField {
        kind: CodeKind,
        field: &'static str,
        value: String,
    },

    /// A numeric field is outside its allowed range.
    #[error("{kind} {field} {value} is out of range [{min}, {max}]")]
    OutOfRange {
        kind: CodeKind,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// ISWC check digit does not match its id.
    #[error("ISWC check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

impl CodeError {
    /// The identifier family this error refers to.
    pub fn kind(&self) -> CodeKind {
        match self {
            Self::Unrecognized { kind, .. }
            | Self::Missing { kind, .. }
            | Self::InvalidField { kind, .. }
            | Self::OutOfRange { kind, .. } => *kind,
            Self::CheckDigitMismatch { .. } => CodeKind::Iswc,
        }
    }

    /// Returns true if the input was rejected by the grammar itself.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for strict code operations.
pub type Result<T> = std::result::Result<T, CodeError>;
