//! Request handlers

pub mod claims;
pub mod countries;
pub mod fields;
pub mod health;
pub mod session;
