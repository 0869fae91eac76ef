//! Validation policy for ISRC ids.

use serde::{Deserialize, Serialize};

/// Rules an [`IsrcCode`](super::IsrcCode) is validated against.
///
/// By default an id must be in `1..=99999`. Some registrants hand out
/// `00000` as a real designation code; allowing zero ids accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsrcPolicy {
    /// Accept id `0` as valid.
    #[serde(default)]
    pub zero_ids_allowed: bool,
}

impl IsrcPolicy {
    /// Ids start at 1.
    pub const fn strict() -> Self {
        Self {
            zero_ids_allowed: false,
        }
    }

    /// Ids start at 0.
    pub const fn allowing_zero_ids() -> Self {
        Self {
            zero_ids_allowed: true,
        }
    }

    /// Lowest id this policy accepts.
    pub const fn min_valid_id(&self) -> i64 {
        if self.zero_ids_allowed {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert_eq!(IsrcPolicy::default(), IsrcPolicy::strict());
        assert_eq!(IsrcPolicy::strict().min_valid_id(), 1);
        assert_eq!(IsrcPolicy::allowing_zero_ids().min_valid_id(), 0);
    }

    #[test]
    fn test_policy_serde() {
        let policy: IsrcPolicy = serde_json::from_str(r#"{"zeroIdsAllowed":true}"#).unwrap();
        assert!(policy.zero_ids_allowed);

        let policy: IsrcPolicy = serde_json::from_str("{}").unwrap();
        assert!(!policy.zero_ids_allowed);
    }
}
