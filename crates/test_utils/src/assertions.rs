//! Custom Test Assertions
//!
//! Assertion helpers for validation and pipeline results that print the
//! whole error map on failure.

use domain_claim_info::{SubmitPipelineResult, ValidationResult};
use indexmap::IndexMap;

fn describe(map: &IndexMap<String, String>) -> String {
    map.iter()
        .map(|(key, message)| format!("{key}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Asserts that `key` carries exactly `message` in an error map
pub fn assert_error_entry(errors: &IndexMap<String, String>, key: &str, message: &str) {
    match errors.get(key) {
        Some(actual) => assert_eq!(
            actual, message,
            "Unexpected message under '{key}'; all errors: [{}]",
            describe(errors)
        ),
        None => panic!("Expected an error under '{key}', got [{}]", describe(errors)),
    }
}

/// Asserts that a validation result failed with `message` under `key`
pub fn assert_validation_error(result: &ValidationResult, key: &str, message: &str) {
    assert!(!result.is_valid, "Expected an invalid result, got a valid one");
    assert_error_entry(&result.errors, key, message);
}

/// Asserts that a validation result carries `message` as a warning under `key`
pub fn assert_validation_warning(result: &ValidationResult, key: &str, message: &str) {
    assert_error_entry(&result.warnings, key, message);
}

/// Asserts that a validation result is valid and has no errors
pub fn assert_valid(result: &ValidationResult) {
    assert!(
        result.is_valid && result.errors.is_empty(),
        "Expected a valid result, got errors [{}]",
        describe(&result.errors)
    );
}

/// Asserts that the pipeline succeeded without errors
pub fn assert_submitted(result: &SubmitPipelineResult) {
    assert!(
        result.success,
        "Expected a successful submit, got '{}' with errors [{}]",
        result.message,
        describe(&result.errors)
    );
    assert!(
        result.errors.is_empty(),
        "Successful submit carried errors [{}]",
        describe(&result.errors)
    );
}

/// Asserts that the pipeline failed with `message` under `key`
pub fn assert_rejected(result: &SubmitPipelineResult, key: &str, message: &str) {
    assert!(!result.success, "Expected a failed submit, got success");
    assert_error_entry(&result.errors, key, message);
}
