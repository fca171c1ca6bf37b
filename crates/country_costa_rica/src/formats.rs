//! Costa Rican document and plate formats

use once_cell::sync::Lazy;
use regex::Regex;

static CEDULA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}-\d{4}-\d{4}$").expect("valid cedula regex"));
static RUC_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9,10}$").expect("valid RUC digits regex"));
static PLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}-\d{3,4}$").expect("valid plate regex"));
static COMMERCIAL_PLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}\d{3}").expect("valid commercial plate regex"));
static PRIVATE_PLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}").expect("valid private plate regex"));

/// Cédula: `1-1234-5678` or `01-1234-5678`
pub fn is_valid_cedula(cedula: &str) -> bool {
    CEDULA.is_match(cedula.trim())
}

/// A cédula, or 9 to 10 digits once spaces and dashes are removed
pub fn is_valid_ruc(ruc: &str) -> bool {
    is_valid_cedula(ruc) || RUC_DIGITS.is_match(&normalize_ruc(ruc))
}

/// Strips spaces and dashes
pub fn normalize_ruc(ruc: &str) -> String {
    ruc.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

/// Three uppercase letters, a dash, three or four digits
pub fn is_valid_plate(plate: &str) -> bool {
    PLATE.is_match(plate.trim())
}

/// Vehicle type implied by the plate format
pub fn vehicle_type(plate: &str) -> &'static str {
    if COMMERCIAL_PLATE.is_match(plate) {
        "commercial"
    } else if PRIVATE_PLATE.is_match(plate) {
        "private"
    } else {
        "unknown"
    }
}
