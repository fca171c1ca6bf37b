//! Panamanian document and plate formats

use once_cell::sync::Lazy;
use regex::Regex;

static NATURAL_TAX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9N]-\d{1,3}-\d{1,6}$").expect("valid natural tax id regex"));
static JURIDICAL_TAX_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(PE|E|N|PI|NT|AV)-\d{1,4}-\d{1,6}$").expect("valid juridical tax id regex")
});
static RUC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7}-\d-\d{6}$").expect("valid RUC regex"));
static NUMERIC_PLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid numeric plate regex"));
static ALPHANUMERIC_PLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}-\d{4}$").expect("valid alphanumeric plate regex"));

/// Insurance zones and their tariff factor
pub const ZONES: [&str; 3] = ["URBAN", "RURAL", "INTERIOR"];

/// Natural person (`8-123-456`) or juridical entity (`PE-12-3456`)
pub fn is_valid_tax_id(tax_id: &str) -> bool {
    let tax_id = tax_id.trim();
    NATURAL_TAX_ID.is_match(tax_id) || JURIDICAL_TAX_ID.is_match(tax_id)
}

/// `1234567-1-123456`
pub fn is_valid_ruc(ruc: &str) -> bool {
    RUC.is_match(ruc.trim())
}

/// Six digits, the only plate format accepted on the form
pub fn is_valid_plate(plate: &str) -> bool {
    NUMERIC_PLATE.is_match(plate.trim())
}

/// Six digits or `ABC-1234`, both accepted at submission
pub fn is_submittable_plate(plate: &str) -> bool {
    NUMERIC_PLATE.is_match(plate) || ALPHANUMERIC_PLATE.is_match(plate)
}

/// Plate format name and the vehicle type it implies
pub fn plate_format(plate: &str) -> (&'static str, &'static str) {
    if NUMERIC_PLATE.is_match(plate) {
        ("numeric", "private")
    } else if ALPHANUMERIC_PLATE.is_match(plate) {
        ("alphanumeric", "commercial")
    } else {
        ("unknown", "unknown")
    }
}

pub fn is_known_zone(zone: &str) -> bool {
    ZONES.contains(&zone)
}
