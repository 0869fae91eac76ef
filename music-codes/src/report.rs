//! JSON description of a parsed code.
//!
//! This is what `music-codes inspect` prints.
//!
//! ```json
//! {
//!   "kind": "isrc",
//!   "input": "gb-a1b-11-00036 isrc",
//!   "valid": true,
//!   "canonical": "GB-A1B-11-00036",
//!   "compact": "GBA1B1100036",
//!   "fields": { "countryCode": "GB", "issuerCode": "A1B", "year": 11, "id": 36, ... }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::code::AnyCode;
use crate::error::CodeKind;

/// Summary of one parsed code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeReport {
    /// Identifier family the input was parsed as.
    pub kind: CodeKind,
    /// Input as given.
    pub input: String,
    /// Whether every invariant holds.
    pub valid: bool,
    /// Display form.
    pub canonical: String,
    /// Form without separators.
    pub compact: String,
    /// Individual fields.
    pub fields: Map<String, Value>,
    /// Why the code is invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CodeReport {
    /// Describe `code`, parsed from `input`.
    pub fn new(code: &AnyCode, input: &str) -> Self {
        let error = code.validate().err().map(|e| e.to_string());

        Self {
            kind: code.kind(),
            input: input.to_string(),
            valid: error.is_none(),
            canonical: code.canonical(),
            compact: code.compact(),
            fields: code.fields(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isrc::IsrcPolicy;
    use serde_json::json;

    #[test]
    fn test_valid_report() {
        let code = AnyCode::detect("gb-a1b-11-00036 isrc", IsrcPolicy::default()).unwrap();
        let report = CodeReport::new(&code, "gb-a1b-11-00036 isrc");

        assert!(report.valid);
        assert_eq!(report.kind, CodeKind::Isrc);
        assert_eq!(report.canonical, "GB-A1B-11-00036");
        assert_eq!(report.compact, "GBA1B1100036");
        assert_eq!(report.fields["year"], json!(11));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], json!("isrc"));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_invalid_report() {
        let code = AnyCode::parse_as(CodeKind::Iswc, "T-034.524.680-2", IsrcPolicy::default());
        let report = CodeReport::new(&code, "T-034.524.680-2");

        assert!(!report.valid);
        assert_eq!(report.fields["checkDigit"], json!(2));
        assert!(report.error.unwrap().contains("expected 1"));
    }
}
