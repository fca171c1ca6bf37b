//! Country-wide validation of the form data

use serde_json::Value;
use std::sync::Arc;

use domain_claim_info::{str_at, CountryValidations, ValidationResult};

use crate::fields::{INSURANCE_ZONE, TAX_ID};
use crate::formats::{is_valid_plate, is_valid_ruc};

const DEPRECIATION_WARNING_PERCENT: f64 = 30.0;

pub fn validate_before_submit(data: &Value) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if let Some(ruc) = str_at(data, "/claimInfo/policy/Owner/ruc") {
        if !is_valid_ruc(ruc) {
            result.add_error("policyOwnerRuc", "Formato de RUC inválido para Panamá");
        }
    }

    if let Some(plate) = str_at(data, "/claimInfo/vehicleInformation/plate") {
        if !is_valid_plate(plate) {
            result.add_error(
                "vehiclePlate",
                "Formato de placa inválido para Panamá (solo números)",
            );
        }
    }

    if str_at(data, &format!("/dynamicFields/{TAX_ID}")).is_none() {
        result.add_error(TAX_ID, "RUC del asegurado es requerido en Panamá");
    }
    if str_at(data, &format!("/dynamicFields/{INSURANCE_ZONE}")).is_none() {
        result.add_error(INSURANCE_ZONE, "Zona de cobertura es requerida en Panamá");
    }

    let depreciation = data
        .pointer("/claimInfo/vehicleInformation/depreciation")
        .and_then(Value::as_f64);
    if depreciation.is_some_and(|percent| percent > DEPRECIATION_WARNING_PERCENT) {
        result.add_warning(
            "depreciation",
            "Depreciación superior al 30% puede requerir aprobación especial",
        );
    }

    result
}

pub fn country_validations() -> CountryValidations {
    CountryValidations {
        validate_before_submit: Some(Arc::new(validate_before_submit)),
        validate_on_load: None,
    }
}
