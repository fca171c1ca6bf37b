//! Core error types used across the system

use thiserror::Error;
use crate::money::MoneyError;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Unsupported country: {0}")]
    UnsupportedCountry(String),
}

impl CoreError {
    pub fn unsupported_country(code: impl Into<String>) -> Self {
        CoreError::UnsupportedCountry(code.into())
    }
}
