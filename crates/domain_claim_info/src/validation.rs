//! Validation results shared by pre-submit validators and country-wide
//! validations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Non-empty string at a JSON pointer
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Result of a validation step
///
/// Errors block submission; warnings never do. Both are keyed by the field
/// or rule they concern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub errors: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub warnings: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    /// Creates a failed validation result with errors
    pub fn fail<K, V>(errors: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            is_valid: false,
            errors: errors.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            ..Self::default()
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, key: impl Into<String>, error: impl Into<String>) {
        self.errors.insert(key.into(), error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, key: impl Into<String>, warning: impl Into<String>) {
        self.warnings.insert(key.into(), warning.into());
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Merges another validation result into this one; its keys win
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        if other.message.is_some() {
            self.message = other.message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_at_skips_empty_and_non_strings() {
        let data = json!({"policy": {"Owner": {"ruc": "", "name": "Ana", "age": 3}}});
        assert_eq!(str_at(&data, "/policy/Owner/name"), Some("Ana"));
        assert_eq!(str_at(&data, "/policy/Owner/ruc"), None);
        assert_eq!(str_at(&data, "/policy/Owner/age"), None);
        assert_eq!(str_at(&data, "/missing"), None);
    }

    #[test]
    fn test_add_error_invalidates() {
        let mut result = ValidationResult::ok();
        result.add_warning("deductible", "high");
        assert!(result.is_valid);
        result.add_error("ruc", "bad");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_merge_later_key_wins() {
        let mut first = ValidationResult::fail([("a", "first")]);
        let mut second = ValidationResult::ok();
        second.add_warning("w", "warned");
        second.errors.insert("a".into(), "second".into());
        first.merge(second);
        assert!(!first.is_valid);
        assert_eq!(first.errors["a"], "second");
        assert_eq!(first.warnings["w"], "warned");
    }
}
