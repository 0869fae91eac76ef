//! Record label codes.
//!
//! A label code is an alphanumeric prefix ending in a letter, an optional
//! dash, then a run of digits: `LC-1234`, `LC01`, `7A-000123`.
//!
//! The width of the digit run is remembered as written and bounds the id:
//! `LC-99` has two digits, so ids live in `1..100`. The width is fixed by
//! parsing and is *not* widened by [`LabelCode::set_id`] or navigation; an
//! id that no longer fits is reported invalid instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::code::{clean_input, impl_code_traits, pad, Direction, MusicCode};
use crate::error::{CodeError, CodeKind, Result};

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z0-9]*[A-Z])-?([0-9]+)$").expect("Invalid label code pattern")
});

struct Captured {
    prefix: String,
    digits: u32,
    id: i64,
}

fn capture(clean: &str) -> Option<Captured> {
    let caps = PATTERN.captures(clean)?;
    let run = &caps[2];

    // Runs wider than an i64 can bound are not representable.
    let digits = u32::try_from(run.len()).ok()?;
    10i64.checked_pow(digits)?;

    Some(Captured {
        prefix: caps[1].to_string(),
        digits,
        id: run.trim_start_matches('0').parse().unwrap_or(0),
    })
}

/// A parsed, possibly invalid, label code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LabelCode {
    prefix: String,
    digits: Option<u32>,
    id: Option<i64>,
}

impl LabelCode {
    /// Empty, invalid code.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a label code. Never fails; check [`is_valid`](Self::is_valid).
    pub fn parse(raw: &str) -> Self {
        let mut code = Self::new();
        code.load(raw);
        code
    }

    /// Build a label code from a prefix (a trailing dash is dropped) and an
    /// id written as it should appear, e.g. `("LC-", "0042")`.
    pub fn from_parts(prefix: impl fmt::Display, id: impl fmt::Display) -> Self {
        let prefix = prefix.to_string();
        Self::parse(&format!("{}{}", prefix.trim_end_matches('-'), id))
    }

    /// Replace the content of this code with the parsed input.
    pub fn load(&mut self, raw: &str) -> &mut Self {
        let clean = clean_input(raw);

        match capture(&clean) {
            Some(c) => {
                self.prefix = c.prefix;
                self.digits = Some(c.digits);
                self.id = Some(c.id);
            }
            None => {
                tracing::debug!(input = %clean, "rejected label code input");
                self.prefix.clear();
                self.digits = None;
                self.id = None;
            }
        }

        self
    }

    /// Prefix and id padded to the parsed width, with a dash between them
    /// when `dashed`.
    pub fn format(&self, dashed: bool) -> String {
        let id = self.id_padded();
        [self.prefix.as_str(), id.as_str()].join(if dashed { "-" } else { "" })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Stored uppercased.
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = prefix.to_ascii_uppercase();
        self
    }

    /// Width of the digit run as parsed.
    pub fn digits(&self) -> Option<u32> {
        self.digits
    }

    /// Exclusive upper bound of the id, `10^digits`.
    pub fn max_id(&self) -> Option<i64> {
        self.digits.and_then(|d| 10i64.checked_pow(d))
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Id padded to the parsed width.
    pub fn id_padded(&self) -> String {
        pad(self.id, self.digits.unwrap_or(0) as usize)
    }

    /// Set the id. The digit width is left untouched.
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = Some(id);
        self
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Step to the next id, never below `min`. Returns validity afterwards.
    pub fn next(&mut self, min: i64) -> bool {
        let id = self.id.unwrap_or(0).saturating_add(1);
        self.set_id(id.max(min));
        self.is_valid()
    }

    /// Step to the previous id, never above `max`; a `max` of zero or less
    /// means the top of the parsed width. Returns validity afterwards.
    pub fn previous(&mut self, max: i64) -> bool {
        let max = if max <= 0 {
            self.max_id().unwrap_or(0)
        } else {
            max
        };

        let id = self.id.unwrap_or(0).saturating_sub(1);
        self.set_id(id.min(max));
        self.is_valid()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(missing("prefix"));
        }

        let max_id = self.max_id().ok_or_else(|| missing("digits"))?;
        let id = self.id.ok_or_else(|| missing("id"))?;

        if id <= 0 || id >= max_id {
            return Err(CodeError::OutOfRange {
                kind: CodeKind::LabelCode,
                field: "id",
                value: id,
                min: 1,
                max: max_id - 1,
            });
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn missing(field: &'static str) -> CodeError {
    CodeError::Missing {
        kind: CodeKind::LabelCode,
        field,
    }
}

impl fmt::Display for LabelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

impl MusicCode for LabelCode {
    const KIND: CodeKind = CodeKind::LabelCode;

    fn matches_grammar(raw: &str) -> bool {
        capture(&clean_input(raw)).is_some()
    }

    fn load(&mut self, raw: &str) -> &mut Self {
        LabelCode::load(self, raw)
    }

    fn validate(&self) -> Result<()> {
        LabelCode::validate(self)
    }

    fn compact(&self) -> String {
        self.format(false)
    }

    fn advance(&mut self, direction: Direction, _flip_year: bool) -> bool {
        match direction {
            Direction::Forward => self.next(0),
            Direction::Backward => self.previous(0),
        }
    }

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("prefix".into(), json!(self.prefix));
        map.insert("digits".into(), json!(self.digits));
        map.insert("id".into(), json!(self.id));
        map.insert("maxId".into(), json!(self.max_id()));
        map
    }
}

impl_code_traits!(LabelCode);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parts() {
        let code = LabelCode::parse("LC-1234");
        assert!(code.is_valid());
        assert_eq!(code.prefix(), "LC");
        assert_eq!(code.id_padded(), "1234");
        assert_eq!(code.id(), Some(1234));
        assert_eq!(code.digits(), Some(4));
        assert_eq!(code.max_id(), Some(10_000));
    }

    #[test]
    fn test_prev_next() {
        let mut code = LabelCode::from_parts("LC", 1234);

        assert!(code.next(0));
        assert_eq!(code.id(), Some(1235));

        assert!(code.previous(0));
        assert!(code.previous(0));
        assert_eq!(code.id(), Some(1233));

        assert!(!code.load("LC-01").previous(0));
        assert_eq!(code.id(), Some(0));

        assert!(!code.load("LC-99").next(0));
        assert_eq!(code.id(), Some(100));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut code = LabelCode::parse("LC-0010");
        assert!(code.next(50));
        assert_eq!(code.format(true), "LC-0050");

        assert!(code.previous(20));
        assert_eq!(code.format(true), "LC-0020");

        let mut code = LabelCode::parse("LC-5000");
        assert!(code.previous(0));
        assert_eq!(code.id(), Some(4999));
    }

    #[test]
    fn test_width_is_not_recomputed() {
        let mut code = LabelCode::parse("LC-1234");
        code.set_id(12_345);
        assert!(!code.is_valid());
        assert_eq!(code.digits(), Some(4));
        assert_eq!(
            code.validate(),
            Err(CodeError::OutOfRange {
                kind: CodeKind::LabelCode,
                field: "id",
                value: 12_345,
                min: 1,
                max: 9_999
            })
        );

        // Padding keeps the parsed width
        code.set_id(7);
        assert_eq!(code.format(false), "LC0007");
    }

    #[test]
    fn test_formatting() {
        let code = LabelCode::parse("LC1234");
        assert_eq!(code.format(true), "LC-1234");
        assert_eq!(code.format(false), "LC1234");
        assert_eq!(code.to_string(), "LC1234");
    }

    #[test]
    fn test_prefix_grammar() {
        let code = LabelCode::parse("4711a-00042");
        assert!(code.is_valid());
        assert_eq!(code.prefix(), "4711A");
        assert_eq!(code.id(), Some(42));
        assert_eq!(code.format(true), "4711A-00042");

        // Greedy prefix: the last letter ends it
        let code = LabelCode::parse("A1B2C3");
        assert_eq!(code.prefix(), "A1B2C");
        assert_eq!(code.id(), Some(3));
    }

    #[test]
    fn test_from_parts() {
        let code = LabelCode::from_parts("LC--", "0042");
        assert!(code.is_valid());
        assert_eq!(code.to_string(), "LC0042");

        assert!(!LabelCode::from_parts("", 42).is_valid());
        assert!(!LabelCode::from_parts("LC", "").is_valid());
    }

    #[test]
    fn test_invalid_inputs() {
        for raw in ["", "1234", "LC-", "LC 1234", "LC-00", "-1234"] {
            assert!(!LabelCode::parse(raw).is_valid(), "{}", raw);
        }

        let wide = format!("LC-{}", "1".repeat(19));
        let code = LabelCode::parse(&wide);
        assert!(!code.is_valid());
        assert_eq!(code.digits(), None);
    }

    #[test]
    fn test_set_prefix() {
        let mut code = LabelCode::parse("LC-1234");
        code.set_prefix("gema");
        assert_eq!(code.to_string(), "GEMA1234");

        code.set_prefix("");
        assert_eq!(
            code.validate(),
            Err(CodeError::Missing {
                kind: CodeKind::LabelCode,
                field: "prefix"
            })
        );
    }

    #[test]
    fn test_strict_parsing_and_serde() {
        let code: LabelCode = "lc-1234".parse().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""LC1234""#);

        let back: LabelCode = serde_json::from_str(r#""LC-1234""#).unwrap();
        assert_eq!(back, code);

        assert!("LC-0000".parse::<LabelCode>().is_err());
        assert!(LabelCode::try_from("!!").unwrap_err().is_unrecognized());
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_fields(
            prefix in "[A-Z0-9]{0,4}[A-Z]",
            run in "[0-9]{1,12}",
            dashed in any::<bool>(),
        ) {
            let code = LabelCode::parse(&format!("{}-{}", prefix, run));
            prop_assert_eq!(code.digits(), Some(run.len() as u32));
            prop_assert_eq!(LabelCode::parse(&code.format(dashed)), code);
        }

        #[test]
        fn garbage_never_panics(raw in "\\PC*", min in any::<i64>(), max in any::<i64>()) {
            let mut code = LabelCode::parse(&raw);
            let _ = code.to_string();
            let _ = code.next(min);
            let _ = code.previous(max);
            let _ = code.is_valid();
        }
    }
}
