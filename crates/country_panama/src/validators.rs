//! Panama pre-submit validators

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::sync::Arc;

use core_kernel::parse_amount;
use domain_claim_info::{validator_fn, ExtensionError, PreSubmitValidator, SubmitContext, ValidationResult};

use crate::fields::{INSURANCE_ZONE, TAX_ID};
use crate::formats::{is_known_zone, is_submittable_plate, is_valid_tax_id};

/// Insured amounts above this get a warning
const HIGH_INSURED_AMOUNT: Decimal = dec!(500000);
const MIN_RUC_LENGTH: usize = 3;

pub fn check_tax_id(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();

    match context.form_str(&format!("/dynamicFields/{TAX_ID}")) {
        Some(tax_id) if !is_valid_tax_id(tax_id) => {
            result.add_error(
                TAX_ID,
                "El Tax ID de Panamá debe tener el formato correcto (ej: 8-123-456 o PE-12-3456)",
            );
            result = result.with_message("Errores de validación en Panamá");
        }
        Some(_) => {}
        None => result.add_warning(TAX_ID, "El Tax ID no está presente en los campos dinámicos"),
    }

    Ok(result)
}

pub fn check_insurance_zone(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();

    match context.form_str(&format!("/dynamicFields/{INSURANCE_ZONE}")) {
        None => result.add_warning(
            INSURANCE_ZONE,
            "La zona de seguro no está presente en los campos dinámicos",
        ),
        Some(zone) if !is_known_zone(zone) => {
            result.add_error(INSURANCE_ZONE, "La zona de seguro debe ser URBAN, RURAL o INTERIOR")
        }
        Some("RURAL") => result.add_warning(INSURANCE_ZONE, "Zona rural: verificar tarifas especiales"),
        Some(_) => {}
    }

    Ok(result)
}

pub fn check_required_fields(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();

    match context.form_str("/claimInfo/policy/Owner/ruc") {
        None => result.add_error("ruc", "El RUC/DV es requerido en Panamá"),
        Some(ruc) if ruc.chars().count() < MIN_RUC_LENGTH => {
            result.add_error("ruc", "El RUC/DV debe tener al menos 3 caracteres")
        }
        Some(_) => {}
    }

    match context.form_str("/claimInfo/vehicleInformation/plate") {
        None => result.add_error("plate", "La placa es requerida"),
        Some(plate) if !is_submittable_plate(plate) => result.add_error(
            "plate",
            "Formato de placa inválido para Panamá (ej: 123456 o ABC-1234)",
        ),
        Some(_) => {}
    }

    if !result.is_valid {
        result = result.with_message("Faltan campos requeridos para Panamá");
    }
    Ok(result)
}

/// Insured amount of the selected coverage, zero when unknown
fn selected_insured_amount(form_data: &Value) -> Decimal {
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

pub fn check_amounts(context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
    let mut result = ValidationResult::ok();
    let insured = selected_insured_amount(&context.form_data);

    if insured <= Decimal::ZERO {
        result.add_error("insuredAmount", "El monto asegurado debe ser mayor a 0");
    }
    if insured > HIGH_INSURED_AMOUNT {
        result.add_warning(
            "insuredAmount",
            "Monto asegurado muy alto para Panamá (> B/. 500,000)",
        );
    }

    Ok(result)
}

pub fn tax_id() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_tax_id)
}

pub fn insurance_zone() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_insurance_zone)
}

pub fn required_fields() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_required_fields)
}

pub fn amounts() -> Arc<dyn PreSubmitValidator> {
    validator_fn(check_amounts)
}
