//! Request and response bodies

pub mod claims;
pub mod fields;
pub mod session;
