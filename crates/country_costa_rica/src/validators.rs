//! Costa Rica pre-submit validators

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::sync::Arc;

use core_kernel::{parse_amount, Money};
use domain_claim_info::{validator_fn, ExtensionError, PreSubmitValidator, SubmitContext, ValidationResult};

use crate::formats::is_valid_ruc;
use crate::COUNTRY;

/// Deductibles above this share of the insured amount get a warning
const DEDUCTIBLE_WARNING_RATIO: Decimal = dec!(0.2);

pub fn check_ruc_format(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();

    match context.form_str("/claimInfo/policy/Owner/ruc") {
        Some(ruc) if !is_valid_ruc(ruc) => {
            result.add_error(
                "ruc",
                "El RUC de Costa Rica debe tener el formato correcto (9 o 10 dígitos)",
            );
            result = result.with_message("Errores de validación en Costa Rica");
        }
        Some(_) => {}
        None => result.add_warning("ruc", "No se proporcionó RUC del propietario de la póliza"),
    }

    Ok(result)
}

pub fn check_required_fields(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();

    if context.form_str("/claimInfo/policy/Owner/name").is_none() {
        result.add_error("ownerName", "El nombre del propietario es requerido");
    }
    if context.form_str("/claimInfo/vehicleInformation/plate").is_none() {
        result.add_error("plate", "La placa del vehículo es requerida");
    }
    if context.form_str("/claimInfo/vehicleInformation/model").is_none() {
        result.add_error("model", "El modelo del vehículo es requerido");
    }

    if !result.is_valid {
        result = result.with_message("Faltan campos requeridos");
    }
    Ok(result)
}

/// Insured amount of the selected coverage, zero when unknown
pub(crate) fn selected_insured_amount(form_data: &Value) -> Decimal {
    let coverage_code = form_data.pointer("/claimInfo/coverageCode");
    form_data
        .pointer("/claimInfo/policy/coverages")
        .and_then(Value::as_array)
        .and_then(|coverages| {
            coverages
                .iter()
                .find(|coverage| coverage.get("coverageCode") == coverage_code)
        })
        .and_then(|coverage| coverage.get("insuredAmount"))
        .and_then(parse_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Applied deductible; the calculated amount when present
fn deductible_amount(form_data: &Value) -> Money {
    ["/claimInfo/deductible/Calculated", "/claimInfo/deductible/amount"]
        .iter()
        .filter_map(|pointer| form_data.pointer(pointer))
        .find_map(|value| Money::from_value(value, COUNTRY.currency()).ok())
        .unwrap_or_else(|| Money::zero(COUNTRY.currency()))
}

pub fn check_amounts(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();
    let insured = Money::new(selected_insured_amount(&context.form_data), COUNTRY.currency());
    let deductible = deductible_amount(&context.form_data);

    if !insured.is_positive() {
        result.add_error("insuredAmount", "El monto asegurado debe ser mayor a 0");
    }
    if deductible.is_negative() {
        result.add_error("deductible", "El deducible no puede ser negativo");
    }
    let above_ratio = match deductible.ratio_of(&insured) {
        Ok(ratio) => ratio > DEDUCTIBLE_WARNING_RATIO,
        Err(_) => deductible.is_positive(),
    };
    if above_ratio {
        result.add_warning("deductible", "El deducible es mayor al 20% del monto asegurado");
    }

    Ok(result)
}

pub fn ruc_format() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_ruc_format)
}

pub fn required_fields() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_required_fields)
}

pub fn amounts() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_amounts)
}
