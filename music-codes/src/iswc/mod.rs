//! International Standard Musical Work Code.
//!
//! An ISWC identifies a musical composition: the letter `T`, a nine digit
//! work id and one check digit, usually written `T-034.524.680-1`.
//!
//! # Check digit
//!
//! For the id digits `d1..d9`:
//!
//! ```text
//! sum   = 1 + 1*d1 + 2*d2 + ... + 9*d9
//! check = (10 - sum % 10) % 10
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::code::{clean_input, impl_code_traits, Direction, MusicCode};
use crate::error::{CodeError, CodeKind, Result};

static UNDASHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(T)([0-9]{3})([0-9]{3})([0-9]{3})([0-9])$").expect("Invalid ISWC pattern")
});

// Group separators are matched loosely, `T-034 524 680-1` is accepted too.
static DASHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(T)-([0-9]{3}).([0-9]{3}).([0-9]{3})-([0-9])$").expect("Invalid ISWC pattern")
});

/// Length of the work id.
pub const ID_LEN: usize = 9;

/// Check digit of a nine digit work id, `None` if `id` is not exactly nine
/// ASCII digits.
pub fn check_digit_for(id: &str) -> Option<u8> {
    if id.len() != ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = 1 + id
        .bytes()
        .zip(1u32..)
        .map(|(b, weight)| weight * u32::from(b - b'0'))
        .sum::<u32>();

    Some(((10 - sum % 10) % 10) as u8)
}

// =============================================================================
// IswcCode
// =============================================================================

/// A parsed, possibly invalid, ISWC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IswcCode {
    prefix: String,
    /// Zero padded work id, kept as text since the check digit is positional.
    id: Option<String>,
    check_digit: Option<u8>,
}

impl IswcCode {
    /// The only valid prefix.
    pub const PREFIX: &'static str = "T";
    pub const MIN_ID: i64 = 1;
    pub const MAX_ID: i64 = 999_999_999;

    /// Empty, invalid code.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an ISWC. Never fails; check [`is_valid`](Self::is_valid).
    pub fn parse(raw: &str) -> Self {
        let mut code = Self::new();
        code.load(raw);
        code
    }

    /// Build an ISWC from a work id, numeric (`34524680`) or dotted
    /// (`"034.524.680"`). The id is zero padded and the check digit
    /// computed.
    pub fn from_id(id: impl fmt::Display) -> Self {
        let digits = id.to_string().replace('.', "");
        let padded = format!("{:0>width$}", digits, width = ID_LEN);
        let check = check_digit_for(&padded)
            .map(|d| d.to_string())
            .unwrap_or_default();

        Self::parse(&format!("{}{}{}", Self::PREFIX, padded, check))
    }

    /// Replace the content of this code with the parsed input, dashed
    /// (`T-NNN.NNN.NNN-C`) or not (`TNNNNNNNNNC`).
    pub fn load(&mut self, raw: &str) -> &mut Self {
        let clean = clean_input(raw);
        let caps = UNDASHED
            .captures(&clean)
            .or_else(|| DASHED.captures(&clean));

        match caps {
            Some(caps) => {
                self.prefix = caps[1].to_string();
                self.id = Some(format!("{}{}{}", &caps[2], &caps[3], &caps[4]));
                self.check_digit = caps[5].parse().ok();
            }
            None => {
                tracing::debug!(input = %clean, "rejected ISWC input");
                self.prefix.clear();
                self.id = None;
                self.check_digit = None;
            }
        }

        self
    }

    /// `T-NNN.NNN.NNN-C` when dashed, `TNNNNNNNNNC` otherwise.
    pub fn format(&self, dashed: bool) -> String {
        let check = self.check_digit_str();
        let id = self.id(dashed);
        let parts = [self.prefix.as_str(), id.as_str(), check.as_str()];
        parts.join(if dashed { "-" } else { "" })
    }

    fn check_digit_str(&self) -> String {
        self.check_digit.map(|d| d.to_string()).unwrap_or_default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Stored uppercased; anything but `T` is invalid.
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = prefix.to_ascii_uppercase();
        self
    }

    /// Work id, in dotted groups of three when `dotted`. Empty when unset.
    pub fn id(&self, dotted: bool) -> String {
        let Some(id) = self.id.as_deref() else {
            return String::new();
        };

        if !dotted {
            return id.to_string();
        }

        id.as_bytes()
            .chunks(3)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Work id as a number.
    pub fn id_number(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.parse().ok())
    }

    pub fn check_digit(&self) -> Option<u8> {
        self.check_digit
    }

    /// Set the work id and recompute the check digit. Ids outside
    /// `1..=999999999` clear the id, leaving the code invalid.
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        if !(Self::MIN_ID..=Self::MAX_ID).contains(&id) {
            tracing::debug!(id, "ISWC id out of range");
            self.id = None;
            return self;
        }

        let padded = format!("{:0width$}", id, width = ID_LEN);
        self.check_digit = check_digit_for(&padded);
        self.id = Some(padded);
        self
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Step to the next id, never below `min`. Returns validity afterwards.
    pub fn next(&mut self, min: i64) -> bool {
        let id = self.id_number().unwrap_or(0).saturating_add(1);
        self.set_id(id.max(min));
        self.is_valid()
    }

    /// Step to the previous id, never above `max`. Returns validity
    /// afterwards.
    pub fn previous(&mut self, max: i64) -> bool {
        let id = self.id_number().unwrap_or(0).saturating_sub(1);
        self.set_id(id.min(max));
        self.is_valid()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(CodeError::Missing {
                kind: CodeKind::Iswc,
                field: "prefix",
            });
        }
        if self.prefix != Self::PREFIX {
            return Err(CodeError::InvalidField {
                kind: CodeKind::Iswc,
                field: "prefix",
                value: self.prefix.clone(),
            });
        }

        let id = self.id.as_deref().ok_or(CodeError::Missing {
            kind: CodeKind::Iswc,
            field: "id",
        })?;
        let expected = check_digit_for(id).ok_or_else(|| CodeError::InvalidField {
            kind: CodeKind::Iswc,
            field: "id",
            value: id.to_string(),
        })?;

        let found = self.check_digit.ok_or(CodeError::Missing {
            kind: CodeKind::Iswc,
            field: "check digit",
        })?;
        if found != expected {
            return Err(CodeError::CheckDigitMismatch { expected, found });
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for IswcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true))
    }
}

impl MusicCode for IswcCode {
    const KIND: CodeKind = CodeKind::Iswc;

    fn matches_grammar(raw: &str) -> bool {
        let clean = clean_input(raw);
        UNDASHED.is_match(&clean) || DASHED.is_match(&clean)
    }

    fn load(&mut self, raw: &str) -> &mut Self {
        IswcCode::load(self, raw)
    }

    fn validate(&self) -> Result<()> {
        IswcCode::validate(self)
    }

    fn compact(&self) -> String {
        self.format(false)
    }

    fn advance(&mut self, direction: Direction, _flip_year: bool) -> bool {
        match direction {
            Direction::Forward => self.next(Self::MIN_ID),
            Direction::Backward => self.previous(Self::MAX_ID),
        }
    }

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("prefix".into(), json!(self.prefix));
        map.insert("id".into(), json!(self.id));
        map.insert("checkDigit".into(), json!(self.check_digit));
        map
    }
}

impl_code_traits!(IswcCode);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parts() {
        let sample = "T-034.524.680-1";
        let iswc = IswcCode::parse(sample);
        assert!(iswc.is_valid());
        assert_eq!(iswc.prefix(), "T");
        assert_eq!(iswc.id(true), "034.524.680");
        assert_eq!(iswc.id(false), "034524680");
        assert_eq!(iswc.id_number(), Some(34_524_680));
        assert_eq!(iswc.check_digit(), Some(1));
        assert_eq!(iswc.to_string(), sample);
        assert_eq!(iswc.format(true), sample);
    }

    #[test]
    fn test_from_id() {
        let iswc = IswcCode::from_id("034.524.680");
        assert!(iswc.is_valid());
        assert_eq!(iswc.prefix(), "T");
        assert_eq!(iswc.check_digit(), Some(1));
        assert_eq!(iswc.id(false), "034524680");

        assert_eq!(IswcCode::from_id(34_524_680), iswc);
        assert!(!IswcCode::from_id("1234567890").is_valid());
        assert!(!IswcCode::from_id("abc").is_valid());
    }

    #[test]
    fn test_prev_next() {
        let mut iswc = IswcCode::from_id("034.524.680");

        assert!(iswc.next(IswcCode::MIN_ID));
        assert_eq!(iswc.id(true), "034.524.681");

        assert!(iswc.previous(IswcCode::MAX_ID));
        assert!(iswc.previous(IswcCode::MAX_ID));
        assert_eq!(iswc.id(true), "034.524.679");
        assert_eq!(iswc.check_digit(), check_digit_for("034524679"));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut iswc = IswcCode::from_id(1);
        assert!(!iswc.previous(IswcCode::MAX_ID));
        assert_eq!(iswc.id(false), "");
        assert_eq!(
            iswc.validate(),
            Err(CodeError::Missing {
                kind: CodeKind::Iswc,
                field: "id"
            })
        );

        // A cleared id restarts from the bottom of the range
        assert!(iswc.next(IswcCode::MIN_ID));
        assert_eq!(iswc.id(false), "000000001");

        let mut iswc = IswcCode::from_id(999_999_999);
        assert!(iswc.is_valid());
        assert!(!iswc.next(IswcCode::MIN_ID));

        let mut iswc = IswcCode::from_id(10);
        assert!(iswc.next(500));
        assert_eq!(iswc.id_number(), Some(500));
        assert!(iswc.previous(20));
        assert_eq!(iswc.id_number(), Some(20));
    }

    #[test]
    fn test_check_digits() {
        let iswcs = [
            "T-911.665.386-2",
            "T-910.126.830-8",
            "T-910.691.619-2",
            "T-913.327.074-3",
            "T-913.587.630-1",
        ];

        for raw in iswcs {
            let expected: u8 = raw[raw.len() - 1..].parse().unwrap();
            let iswc = IswcCode::parse(raw);
            assert!(iswc.is_valid(), "{}", raw);
            assert_eq!(iswc.check_digit(), Some(expected));
            assert_eq!(check_digit_for(&iswc.id(false)), Some(expected));
        }

        assert_eq!(check_digit_for("034524680"), Some(1));
        assert_eq!(check_digit_for("03452468"), None);
        assert_eq!(check_digit_for("03452468X"), None);
    }

    #[test]
    fn test_check_digit_mismatch() {
        let iswc = IswcCode::parse("T-034.524.680-2");
        assert!(!iswc.is_valid());
        assert_eq!(
            iswc.validate(),
            Err(CodeError::CheckDigitMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_formatting() {
        let iswc = IswcCode::from_id("034.524.680");
        assert_eq!(iswc.format(false), "T0345246801");
        assert_eq!(iswc.format(true), "T-034.524.680-1");
        assert_eq!(iswc.to_string(), "T-034.524.680-1");
    }

    #[test]
    fn test_prefix() {
        let mut iswc = IswcCode::parse("t0345246801");
        assert!(iswc.is_valid());

        iswc.set_prefix("x");
        assert_eq!(iswc.prefix(), "X");
        assert!(matches!(
            iswc.validate(),
            Err(CodeError::InvalidField { field: "prefix", .. })
        ));

        iswc.set_prefix("t");
        assert!(iswc.is_valid());
    }

    #[test]
    fn test_invalid_inputs() {
        for raw in ["", "T", "T-034.524.680", "X0345246801", "T-0345.24.680-1", "T03452468011"] {
            let iswc = IswcCode::parse(raw);
            assert!(!iswc.is_valid(), "{}", raw);
            assert_eq!(iswc.prefix(), "");
        }
    }

    #[test]
    fn test_strict_parsing_and_serde() {
        let iswc: IswcCode = " t-034.524.680-1 ".parse().unwrap();
        assert_eq!(serde_json::to_string(&iswc).unwrap(), r#""T-034.524.680-1""#);

        let back: IswcCode = serde_json::from_str(r#""T0345246801""#).unwrap();
        assert_eq!(back, iswc);

        let err = "T-034.524.680-9".parse::<IswcCode>().unwrap_err();
        assert!(matches!(err, CodeError::CheckDigitMismatch { .. }));
        assert!(serde_json::from_str::<IswcCode>(r#""T-034""#).is_err());
    }

    proptest! {
        #[test]
        fn from_id_is_always_valid(id in 1i64..=999_999_999) {
            let iswc = IswcCode::from_id(id);
            prop_assert!(iswc.is_valid());
            prop_assert_eq!(iswc.id_number(), Some(id));
        }

        #[test]
        fn roundtrip_preserves_fields(id in 1i64..=999_999_999, dashed in any::<bool>()) {
            let iswc = IswcCode::from_id(id);
            prop_assert_eq!(IswcCode::parse(&iswc.format(dashed)), iswc);
        }

        #[test]
        fn single_digit_change_is_detected(id in 1i64..=999_999_999, delta in 1u8..=9) {
            let iswc = IswcCode::from_id(id);
            let check = iswc.check_digit().unwrap();
            let wrong = (check + delta) % 10;
            let raw = format!("T{}{}", iswc.id(false), wrong);
            prop_assert!(!IswcCode::parse(&raw).is_valid());
        }

        #[test]
        fn garbage_never_panics(raw in "\\PC*") {
            let mut iswc = IswcCode::parse(&raw);
            let _ = iswc.to_string();
            let _ = iswc.next(IswcCode::MIN_ID);
            let _ = IswcCode::from_id(&raw).is_valid();
        }
    }
}
