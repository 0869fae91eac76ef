//! Shared surface of the three identifier types.
//!
//! [`MusicCode`] is what the CLI and the report builder work against, so a
//! code of any kind can be loaded, checked, formatted and stepped through
//! its sequence without knowing which concrete type it is. [`AnyCode`]
//! carries one parsed code of a kind picked at runtime (see [`detect`]).

use serde_json::{Map, Value};
use std::fmt;

use crate::error::{CodeError, CodeKind, Result};
use crate::isrc::{IsrcCode, IsrcPolicy};
use crate::iswc::IswcCode;
use crate::label_code::LabelCode;

mod macros;

pub(crate) use macros::impl_code_traits;

// =============================================================================
// Navigation
// =============================================================================

/// Direction of a sequence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher ids (`next`).
    Forward,
    /// Towards lower ids (`previous`).
    Backward,
}

// =============================================================================
// MusicCode trait
// =============================================================================

/// Common operations of ISRC, ISWC and label codes.
pub trait MusicCode: Clone + Default + fmt::Display {
    /// Identifier family of the implementing type.
    const KIND: CodeKind;

    /// Returns true if the (trimmed, uppercased) input matches one of the
    /// grammars of this kind, whatever the field values.
    fn matches_grammar(raw: &str) -> bool;

    /// Replace the content of this code with the parsed input.
    fn load(&mut self, raw: &str) -> &mut Self;

    /// First rule the current fields break, if any.
    fn validate(&self) -> Result<()>;

    /// Whether all invariants of this code hold.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Display form (dashed for ISRC and ISWC).
    fn canonical(&self) -> String {
        self.to_string()
    }

    /// Form without separators.
    fn compact(&self) -> String;

    /// Move one step with the default bound of the type. Returns validity
    /// after the step. `flip_year` only affects ISRC codes.
    fn advance(&mut self, direction: Direction, flip_year: bool) -> bool;

    /// Individual fields, keyed in camelCase.
    fn fields(&self) -> Map<String, Value>;
}

/// Strict parse shared by every `FromStr` implementation.
pub(crate) fn parse_strict<C: MusicCode>(raw: &str) -> Result<C> {
    if !C::matches_grammar(raw) {
        return Err(CodeError::Unrecognized {
            kind: C::KIND,
            input: raw.trim().to_string(),
        });
    }

    let mut code = C::default();
    code.load(raw);
    code.validate()?;
    Ok(code)
}

/// Trim and uppercase (ASCII only) before grammar matching.
pub(crate) fn clean_input(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Zero pad an optional number, empty when unset.
pub(crate) fn pad(value: Option<i64>, width: usize) -> String {
    value
        .map(|v| format!("{:0width$}", v, width = width))
        .unwrap_or_default()
}

// =============================================================================
// Detection
// =============================================================================

/// Guess the identifier family of an input by grammar.
///
/// ISRC grammars are tried first, then ISWC, then label codes. An ISWC
/// such as `T0345246801` also has the shape of a label code, so the order
/// matters.
pub fn detect(raw: &str) -> Option<CodeKind> {
    if IsrcCode::matches_grammar(raw) {
        Some(CodeKind::Isrc)
    } else if IswcCode::matches_grammar(raw) {
        Some(CodeKind::Iswc)
    } else if LabelCode::matches_grammar(raw) {
        Some(CodeKind::LabelCode)
    } else {
        None
    }
}

// =============================================================================
// AnyCode
// =============================================================================

/// A parsed code of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyCode {
    Isrc(IsrcCode),
    Iswc(IswcCode),
    LabelCode(LabelCode),
}

impl AnyCode {
    /// Parse `raw` as the given kind. The result may be invalid.
    pub fn parse_as(kind: CodeKind, raw: &str, policy: IsrcPolicy) -> Self {
        match kind {
            CodeKind::Isrc => Self::Isrc(IsrcCode::parse_with_policy(raw, policy)),
            CodeKind::Iswc => Self::Iswc(IswcCode::parse(raw)),
            CodeKind::LabelCode => Self::LabelCode(LabelCode::parse(raw)),
        }
    }

    /// Detect the kind of `raw` and parse it. `None` if no grammar matches.
    pub fn detect(raw: &str, policy: IsrcPolicy) -> Option<Self> {
        detect(raw).map(|kind| Self::parse_as(kind, raw, policy))
    }

    pub fn kind(&self) -> CodeKind {
        match self {
            Self::Isrc(_) => CodeKind::Isrc,
            Self::Iswc(_) => CodeKind::Iswc,
            Self::LabelCode(_) => CodeKind::LabelCode,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Isrc(c) => c.validate(),
            Self::Iswc(c) => c.validate(),
            Self::LabelCode(c) => c.validate(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn canonical(&self) -> String {
        self.to_string()
    }

    pub fn compact(&self) -> String {
        match self {
            Self::Isrc(c) => c.compact(),
            Self::Iswc(c) => c.compact(),
            Self::LabelCode(c) => c.compact(),
        }
    }

    /// Format with or without separators. `prefixed` only applies to ISRC.
    pub fn format(&self, dashed: bool, prefixed: bool) -> String {
        match self {
            Self::Isrc(c) => c.format(dashed, prefixed),
            Self::Iswc(c) => c.format(dashed),
            Self::LabelCode(c) => c.format(dashed),
        }
    }

    pub fn advance(&mut self, direction: Direction, flip_year: bool) -> bool {
        match self {
            Self::Isrc(c) => c.advance(direction, flip_year),
            Self::Iswc(c) => c.advance(direction, flip_year),
            Self::LabelCode(c) => c.advance(direction, flip_year),
        }
    }

    pub fn fields(&self) -> Map<String, Value> {
        match self {
            Self::Isrc(c) => c.fields(),
            Self::Iswc(c) => c.fields(),
            Self::LabelCode(c) => c.fields(),
        }
    }
}

impl fmt::Display for AnyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isrc(c) => fmt::Display::fmt(c, f),
            Self::Iswc(c) => fmt::Display::fmt(c, f),
            Self::LabelCode(c) => fmt::Display::fmt(c, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(detect("GB-A1B-11-00036"), Some(CodeKind::Isrc));
        assert_eq!(detect("isrc gba1b1100036"), Some(CodeKind::Isrc));
        assert_eq!(detect("T-034.524.680-1"), Some(CodeKind::Iswc));
        assert_eq!(detect("T0345246801"), Some(CodeKind::Iswc));
        assert_eq!(detect("LC-1234"), Some(CodeKind::LabelCode));
        assert_eq!(detect("hello world"), None);
        assert_eq!(detect(""), None);
    }

    #[test]
    fn test_any_code_dispatch() {
        let code = AnyCode::detect("gb-a1b-11-00036", IsrcPolicy::default()).unwrap();
        assert_eq!(code.kind(), CodeKind::Isrc);
        assert!(code.is_valid());
        assert_eq!(code.canonical(), "GB-A1B-11-00036");
        assert_eq!(code.compact(), "GBA1B1100036");
        assert_eq!(code.format(false, true), "ISRC GBA1B1100036");

        let code = AnyCode::parse_as(CodeKind::LabelCode, "LC1234", IsrcPolicy::default());
        assert_eq!(code.canonical(), "LC1234");
        assert_eq!(code.format(true, true), "LC-1234");
    }

    #[test]
    fn test_any_code_advance() {
        let mut code = AnyCode::parse_as(CodeKind::Iswc, "T-034.524.680-1", IsrcPolicy::default());
        assert!(code.advance(Direction::Forward, false));
        assert_eq!(code.canonical(), "T-034.524.681-2");
        assert!(code.advance(Direction::Backward, false));
        assert_eq!(code.canonical(), "T-034.524.680-1");
    }

    #[test]
    fn test_parse_strict_reports_grammar_failure() {
        let err = parse_strict::<LabelCode>("???").unwrap_err();
        assert_eq!(
            err,
            CodeError::Unrecognized {
                kind: CodeKind::LabelCode,
                input: "???".into()
            }
        );
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(Some(36), 5), "00036");
        assert_eq!(pad(Some(123456), 5), "123456");
        assert_eq!(pad(None, 2), "");
    }
}
