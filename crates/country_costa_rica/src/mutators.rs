//! Costa Rica payload mutators

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Number, Value};
use std::sync::Arc;

use core_kernel::{parse_amount, Currency};
use domain_claim_info::{mutator_fn, ExtensionError, PayloadMutator, SubmitContext};

use crate::formats::{normalize_ruc as strip_ruc, vehicle_type};
use crate::COUNTRY;

const DEDUCTIBLE_AMOUNT_KEYS: [&str; 3] = ["amount", "Base", "Calculated"];

pub fn add_country_metadata(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let metadata = json!({
        "country": COUNTRY.name(),
        "countryCode": COUNTRY.code(),
        "currency": COUNTRY.currency().code(),
        "timezone": COUNTRY.timezone().name(),
        "locale": COUNTRY.locale(),
    });
    context.set_payload("countryMetadata", metadata);
    context.set_payload("submittedAt", Value::String(Utc::now().to_rfc3339()));
    Ok(())
}

/// Strips spaces and dashes from the owner's RUC, keeping the original in metadata
pub fn normalize_owner_ruc(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(ruc) = context.payload_str("/claimInfo/policy/Owner/ruc").map(str::to_string) else {
        return Ok(());
    };

    if let Some(slot) = context.payload.pointer_mut("/claimInfo/policy/Owner/ruc") {
        *slot = Value::String(strip_ruc(&ruc));
    }
    context.metadata.insert("rucNormalized".into(), Value::Bool(true));
    context.metadata.insert("originalRuc".into(), Value::String(ruc));
    Ok(())
}

/// Turns textual deductible amounts into numbers and tags the currency
pub fn normalize_colon_amounts(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(claim_info) = context
        .payload
        .get_mut("claimInfo")
        .and_then(Value::as_object_mut)
    else {
        return Ok(());
    };

    if let Some(deductible) = claim_info.get_mut("deductible").and_then(Value::as_object_mut) {
        for key in DEDUCTIBLE_AMOUNT_KEYS {
            let Some(amount) = deductible.get_mut(key) else {
                continue;
            };
            if amount.is_string() {
                if let Some(number) = parse_amount(amount)
                    .and_then(|decimal| decimal.to_f64())
                    .and_then(Number::from_f64)
                {
                    *amount = Value::Number(number);
                }
            }
        }
    }

    claim_info.insert("currencySymbol".into(), Currency::CRC.symbol().into());
    claim_info.insert("currencyCode".into(), Currency::CRC.code().into());
    Ok(())
}

/// Marks the vehicle as Costa Rican and infers its type from the plate
pub fn enrich_vehicle_information(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(vehicle) = context
        .payload
        .pointer_mut("/claimInfo/vehicleInformation")
        .and_then(Value::as_object_mut)
    else {
        return Ok(());
    };

    let plate = vehicle
        .get("plate")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    vehicle.insert("country".into(), COUNTRY.code().into());
    vehicle.insert("vehicleType".into(), vehicle_type(&plate).into());
    Ok(())
}

pub fn country_metadata() -> Arc<dyn PayloadMutator> {
    mutator_fn(add_country_metadata)
}

pub fn normalize_ruc() -> Arc<dyn PayloadMutator> {
    mutator_fn(normalize_owner_ruc)
}

pub fn normalize_amounts() -> Arc<dyn PayloadMutator> {
    mutator_fn(normalize_colon_amounts)
}

pub fn enrich_vehicle() -> Arc<dyn PayloadMutator> {
    mutator_fn(enrich_vehicle_information)
}
