//! Error types for the claim info domain

use core_kernel::{CoreError, CountryCode};
use thiserror::Error;

/// Error raised by a country extension: a loader, state slice, validator,
/// mutator, post-handler or submit function
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ExtensionError {
    pub message: String,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ExtensionError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ExtensionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Claim info domain errors
#[derive(Debug, Error)]
pub enum ClaimInfoError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Country configuration not found for: {country}")]
    ConfigurationNotFound {
        country: CountryCode,
        #[source]
        source: ExtensionError,
    },

    #[error("Load of {0} configuration superseded by a cache clear")]
    LoadSuperseded(CountryCode),

    #[error("Unknown state action: {0}")]
    UnknownAction(String),

    #[error("State action {action} failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: ExtensionError,
    },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl ClaimInfoError {
    pub fn configuration_not_found(country: CountryCode, reason: impl Into<String>) -> Self {
        ClaimInfoError::ConfigurationNotFound {
            country,
            source: ExtensionError::new(reason),
        }
    }
}
