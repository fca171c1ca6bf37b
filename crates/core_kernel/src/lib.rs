//! Core Kernel - Foundational types for the claim info form
//!
//! This crate provides the building blocks shared by the form core and the
//! country extension bundles:
//! - The closed set of supported countries with their currency and timezone
//! - Money amounts with precise decimal arithmetic
//! - Strongly-typed identifiers

pub mod country;
pub mod money;
pub mod identifiers;
pub mod error;

pub use country::CountryCode;
pub use money::{Money, Currency, MoneyError, parse_amount};
pub use identifiers::SubmissionId;
pub use error::CoreError;
