//! Country-wide validation of the form data

use serde_json::Value;
use std::sync::Arc;

use domain_claim_info::{str_at, CountryValidations, ValidationResult};

use crate::formats::{is_valid_cedula, is_valid_plate};

/// Checks the owner's cédula and the plate when present
pub fn validate_before_submit(data: &Value) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if let Some(ruc) = str_at(data, "/claimInfo/policy/Owner/ruc") {
        if !is_valid_cedula(ruc) {
            result.add_error("policyOwnerRuc", "Formato de cédula inválido para Costa Rica");
        }
    }

    if let Some(plate) = str_at(data, "/claimInfo/vehicleInformation/plate") {
        if !is_valid_plate(plate) {
            result.add_error("vehiclePlate", "Formato de placa inválido para Costa Rica");
        }
    }

    result
}

pub fn country_validations() -> CountryValidations {
    CountryValidations {
        validate_before_submit: Some(Arc::new(validate_before_submit)),
        validate_on_load: None,
    }
}
