//! International Standard Recording Code.
//!
//! An ISRC identifies one sound recording. It has four fields:
//!
//! ```text
//!  GB - A1B - 11 - 00036
//!  │    │     │    └── id (designation code, 5 digits)
//!  │    │     └─────── year of reference (2 digits)
//!  │    └───────────── issuer (registrant code, 3 alphanumerics)
//!  └────────────────── country (2 letters)
//! ```
//!
//! The country and issuer together form the *prefix* handed to a
//! registrant. Allocating recordings means walking the id within a year,
//! optionally rolling over into the adjacent year ("flip") when the id
//! leaves `1..=99999`.
//!
//! # Example
//!
//! ```rust
//! use music_codes::IsrcCode;
//!
//! let mut isrc = IsrcCode::parse("gb-a1b-11-99999 isrc");
//! assert!(isrc.is_valid());
//!
//! // Roll over into the next year
//! assert!(isrc.next(0, true));
//! assert_eq!(isrc.to_string(), "GB-A1B-12-00001");
//! ```

mod policy;

pub use policy::IsrcPolicy;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::code::{clean_input, impl_code_traits, pad, Direction, MusicCode};
use crate::error::{CodeError, CodeKind, Result};

// Non-word separators are classified as ASCII: anything but [A-Z0-9_].
static UNDASHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ISRC[^A-Z0-9_]*)?([A-Z]{2})([A-Z0-9]{3})([0-9]{2})([0-9]{5})(?:[^A-Z0-9_]*ISRC)?$")
        .expect("Invalid ISRC pattern")
});

static DASHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ISRC[^A-Z0-9_]*)?([A-Z]{2})-([A-Z0-9]{3})-([0-9]{2})-([0-9]{5})(?:[^A-Z0-9_]*ISRC)?$")
        .expect("Invalid ISRC pattern")
});

static PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{2})-?([A-Z0-9]{3})$").expect("Invalid ISRC prefix pattern")
});

/// Fields captured by one of the ISRC grammars.
struct Captured {
    country_code: String,
    issuer_code: String,
    year: i64,
    id: i64,
}

fn capture(clean: &str) -> Option<Captured> {
    let caps = UNDASHED
        .captures(clean)
        .or_else(|| DASHED.captures(clean))?;

    // Both digit groups are bounded by the grammar, parsing cannot overflow.
    Some(Captured {
        country_code: caps[1].to_string(),
        issuer_code: caps[2].to_string(),
        year: caps[3].parse().ok()?,
        id: caps[4].trim_start_matches('0').parse().unwrap_or(0),
    })
}

// =============================================================================
// IsrcCode
// =============================================================================

/// A parsed, possibly invalid, ISRC.
///
/// Every operation leaves the code in a consistent state: validity is
/// computed from the fields whenever it is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IsrcCode {
    country_code: String,
    issuer_code: String,
    year: Option<i64>,
    id: Option<i64>,
    policy: IsrcPolicy,
}

impl IsrcCode {
    /// Lowest id reachable by sequence navigation.
    pub const MIN_ID: i64 = 1;
    /// Highest id.
    pub const MAX_ID: i64 = 99_999;
    /// Highest two-digit year.
    pub const MAX_YEAR: i64 = 99;

    /// Empty, invalid code.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an ISRC with the default policy. Never fails; check
    /// [`is_valid`](Self::is_valid).
    pub fn parse(raw: &str) -> Self {
        let mut code = Self::new();
        code.load(raw);
        code
    }

    /// Parse an ISRC validated against `policy`.
    pub fn parse_with_policy(raw: &str, policy: IsrcPolicy) -> Self {
        Self::parse(raw).with_policy(policy)
    }

    /// Build an ISRC by concatenating the parts verbatim and parsing the
    /// result, so `("GB", "A1B", "11", "00036")` works but unpadded
    /// numbers do not.
    pub fn from_parts(
        country_code: impl fmt::Display,
        issuer_code: impl fmt::Display,
        year: impl fmt::Display,
        id: impl fmt::Display,
    ) -> Self {
        Self::parse(&format!("{}{}{}{}", country_code, issuer_code, year, id))
    }

    /// Replace the validation policy.
    pub fn with_policy(mut self, policy: IsrcPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the content of this code with the parsed input.
    ///
    /// Input is trimmed and uppercased, and may carry an `ISRC` marker
    /// before or after the code. Unrecognized input clears every field.
    pub fn load(&mut self, raw: &str) -> &mut Self {
        let clean = clean_input(raw);

        match capture(&clean) {
            Some(c) => {
                self.country_code = c.country_code;
                self.issuer_code = c.issuer_code;
                self.year = Some(c.year);
                self.id = Some(c.id);
            }
            None => {
                tracing::debug!(input = %clean, "rejected ISRC input");
                self.country_code.clear();
                self.issuer_code.clear();
                self.year = None;
                self.id = None;
            }
        }

        self
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Format as `CC-III-YY-NNNNN` (dashed) or `CCIIIYYNNNNN`, with a
    /// leading `ISRC ` when `prefixed`.
    pub fn format(&self, dashed: bool, prefixed: bool) -> String {
        let year = self.year_padded();
        let id = self.id_padded();
        let parts = [self.country_code.as_str(), self.issuer_code.as_str(), year.as_str(), id.as_str()];
        let joined = parts.join(if dashed { "-" } else { "" });

        if prefixed {
            format!("ISRC {}", joined)
        } else {
            joined
        }
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Country and issuer codes, optionally dash separated.
    pub fn prefix(&self, dashed: bool) -> String {
        if dashed {
            format!("{}-{}", self.country_code, self.issuer_code)
        } else {
            format!("{}{}", self.country_code, self.issuer_code)
        }
    }

    /// Set country and issuer at once from `CCIII` or `CC-III`. Input that
    /// is not a prefix clears both.
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        let clean = clean_input(prefix);

        match PREFIX.captures(&clean) {
            Some(caps) => {
                self.country_code = caps[1].to_string();
                self.issuer_code = caps[2].to_string();
            }
            None => {
                tracing::debug!(input = %clean, "rejected ISRC prefix");
                self.country_code.clear();
                self.issuer_code.clear();
            }
        }

        self
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Stored as given; validation flags anything but two letters.
    pub fn set_country_code(&mut self, country_code: impl Into<String>) -> &mut Self {
        self.country_code = country_code.into();
        self
    }

    pub fn issuer_code(&self) -> &str {
        &self.issuer_code
    }

    /// Stored as given; validation flags anything but three alphanumerics.
    pub fn set_issuer_code(&mut self, issuer_code: impl Into<String>) -> &mut Self {
        self.issuer_code = issuer_code.into();
        self
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }

    /// Year padded to two digits.
    pub fn year_padded(&self) -> String {
        pad(self.year, 2)
    }

    /// Set the year. When the year changes and `reset_id_to` is given, the
    /// id is also set to it (without flip); numbering restarts per year.
    pub fn set_year(&mut self, year: i64, reset_id_to: Option<i64>) -> &mut Self {
        if let Some(id) = reset_id_to.filter(|_| self.year != Some(year)) {
            self.set_id(id, false);
        }
        self.year = Some(year);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Id padded to five digits.
    pub fn id_padded(&self) -> String {
        pad(self.id, 5)
    }

    /// Set the id.
    ///
    /// With `flip_year`, an id outside `1..=99999` is carried into the year:
    /// every 99999 above the range adds a year, every 99999 below removes
    /// one, and the year wraps around within `0..=99`. Without it the id is
    /// stored as is and may be invalid.
    pub fn set_id(&mut self, id: i64, flip_year: bool) -> &mut Self {
        self.id = Some(if flip_year { self.carry_into_year(id) } else { id });
        self
    }

    fn carry_into_year(&mut self, id: i64) -> i64 {
        let span = Self::MAX_ID - Self::MIN_ID + 1;
        let offset = id.saturating_sub(Self::MIN_ID);
        let carries = offset.div_euclid(span);

        if carries != 0 {
            let year = self.year.unwrap_or(0);
            let wrapped = (year.rem_euclid(100) + carries.rem_euclid(100)).rem_euclid(100);
            tracing::trace!(id, carries, year = wrapped, "carried ISRC id into year");
            self.year = Some(wrapped);
        }

        offset.rem_euclid(span) + Self::MIN_ID
    }

    pub fn policy(&self) -> IsrcPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: IsrcPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Step to the next id, never below `min`. Returns validity afterwards.
    ///
    /// Without `flip_year`, stepping past 99999 leaves an invalid code.
    pub fn next(&mut self, min: i64, flip_year: bool) -> bool {
        let id = self.id.unwrap_or(0).saturating_add(1);
        self.set_id(id.max(min), flip_year);
        self.is_valid()
    }

    /// Step to the previous id, never above `max`. Returns validity
    /// afterwards.
    pub fn previous(&mut self, max: i64, flip_year: bool) -> bool {
        let id = self.id.unwrap_or(0).saturating_sub(1);
        self.set_id(id.min(max), flip_year);
        self.is_valid()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// First rule the current fields break, if any.
    pub fn validate(&self) -> Result<()> {
        check_code(
            "country code",
            &self.country_code,
            2,
            |c| c.is_ascii_uppercase(),
        )?;
        check_code(
            "issuer code",
            &self.issuer_code,
            3,
            |c| c.is_ascii_uppercase() || c.is_ascii_digit(),
        )?;
        check_range("year", self.year, 0, Self::MAX_YEAR)?;
        check_range("id", self.id, self.policy.min_valid_id(), Self::MAX_ID)?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn check_code(field: &'static str, value: &str, len: usize, allowed: fn(char) -> bool) -> Result<()> {
    if value.is_empty() {
        return Err(CodeError::Missing {
            kind: CodeKind::Isrc,
            field,
        });
    }

    if value.chars().count() != len || !value.chars().all(allowed) {
        return Err(CodeError::InvalidField {
            kind: CodeKind::Isrc,
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}

fn check_range(field: &'static str, value: Option<i64>, min: i64, max: i64) -> Result<()> {
    match value {
        None => Err(CodeError::Missing {
            kind: CodeKind::Isrc,
            field,
        }),
        Some(v) if v < min || v > max => Err(CodeError::OutOfRange {
            kind: CodeKind::Isrc,
            field,
            value: v,
            min,
            max,
        }),
        Some(_) => Ok(()),
    }
}

impl fmt::Display for IsrcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true, false))
    }
}

impl MusicCode for IsrcCode {
    const KIND: CodeKind = CodeKind::Isrc;

    fn matches_grammar(raw: &str) -> bool {
        capture(&clean_input(raw)).is_some()
    }

    fn load(&mut self, raw: &str) -> &mut Self {
        IsrcCode::load(self, raw)
    }

    fn validate(&self) -> Result<()> {
        IsrcCode::validate(self)
    }

    fn compact(&self) -> String {
        self.format(false, false)
    }

    fn advance(&mut self, direction: Direction, flip_year: bool) -> bool {
        match direction {
            Direction::Forward => self.next(Self::MIN_ID, flip_year),
            Direction::Backward => self.previous(Self::MAX_ID, flip_year),
        }
    }

    fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("countryCode".into(), json!(self.country_code));
        map.insert("issuerCode".into(), json!(self.issuer_code));
        map.insert("year".into(), json!(self.year));
        map.insert("id".into(), json!(self.id));
        map.insert("zeroIdsAllowed".into(), json!(self.policy.zero_ids_allowed));
        map
    }
}

impl_code_traits!(IsrcCode);

// =============================================================================
// Tests
// =============================================================================
