//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim info test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims and form data per country
//! - `builders`: Builder patterns for country bundles and form data
//! - `doubles`: Recording submitters and scripted submit extensions
//! - `assertions`: Assertion helpers for validation and pipeline results
//! - `generators`: Property-based generators for field overrides

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
