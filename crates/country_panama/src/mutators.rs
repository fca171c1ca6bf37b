//! Panama payload mutators
//!
//! Country-specific additions are grouped under `panamaSpecific` in the
//! payload.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Map, Number, Value};
use std::sync::Arc;

use core_kernel::{parse_amount, Currency};
use domain_claim_info::{mutator_fn, ExtensionError, PayloadMutator, SubmitContext};

use crate::fields::{INSURANCE_ZONE, TAX_ID};
use crate::formats::plate_format;
use crate::COUNTRY;

pub const PANAMA_SPECIFIC: &str = "panamaSpecific";

/// Name used in payload metadata and documents
pub const COUNTRY_LABEL: &str = "Panama";

/// Tariff factor and description for a zone; unknown zones are urban
pub fn zone_tariff(zone: &str) -> Value {
    match zone {
        "RURAL" => json!({"factor": 1.2, "description": "Zona rural - tarifa incrementada 20%"}),
        "INTERIOR" => json!({"factor": 1.15, "description": "Interior - tarifa incrementada 15%"}),
        _ => json!({"factor": 1.0, "description": "Zona urbana - tarifa estándar"}),
    }
}

fn panama_specific(context: &mut SubmitContext, f: impl FnOnce(&mut Map<String, Value>)) {
    context.with_payload_object(|payload| {
        let entry = payload
            .entry(PANAMA_SPECIFIC)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(specific) = entry {
            f(specific);
        }
    });
}

pub fn add_country_metadata(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let metadata = json!({
        "country": COUNTRY_LABEL,
        "countryCode": COUNTRY.code(),
        "currency": COUNTRY.currency().code(),
        "currencyAlternative": Currency::USD.code(),
        "timezone": COUNTRY.timezone().name(),
        "locale": COUNTRY.locale(),
    });
    context.set_payload("countryMetadata", metadata);
    context.set_payload("submittedAt", Value::String(Utc::now().to_rfc3339()));
    Ok(())
}

/// Copies the trimmed, uppercased tax id into `panamaSpecific.taxId`
pub fn normalize_dynamic_tax_id(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(tax_id) = context
        .form_str(&format!("/dynamicFields/{TAX_ID}"))
        .map(str::to_string)
    else {
        return Ok(());
    };

    let normalized = tax_id.trim().to_uppercase();
    panama_specific(context, |specific| {
        specific.insert("taxId".into(), Value::String(normalized));
    });
    context.metadata.insert("taxIdNormalized".into(), Value::Bool(true));
    context.metadata.insert("originalTaxId".into(), Value::String(tax_id));
    Ok(())
}

pub fn add_insurance_zone_information(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(zone) = context
        .form_str(&format!("/dynamicFields/{INSURANCE_ZONE}"))
        .map(str::to_string)
    else {
        return Ok(());
    };

    let tariff = zone_tariff(&zone);
    panama_specific(context, |specific| {
        specific.insert("insuranceZone".into(), Value::String(zone));
        specific.insert("zoneTariff".into(), tariff);
    });
    Ok(())
}

/// Turns a textual deductible amount into a number and tags both currencies
pub fn normalize_balboa_amounts(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    let Some(claim_info) = context
        .payload
        .get_mut("claimInfo")
        .and_then(Value::as_object_mut)
    else {
        return Ok(());
    };

    if let Some(amount) = claim_info
        .get_mut("deductible")
        .and_then(|deductible| deductible.get_mut("amount"))
        .filter(|amount| amount.is_string())
    {
        if let Some(number) = parse_amount(amount)
            .and_then(|decimal| decimal.to_f64())
            .and_then(Number::from_f64)
        {
            *amount = Value::Number(number);
        }
    }

    claim_info.insert("currencySymbol".into(), Currency::PAB.symbol().into());
    claim_info.insert("currencyCode".into(), Currency::PAB.code().into());
    claim_info.insert("currencyAlternative".into(), Currency::USD.code().into());
    Ok(())
}

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
    let (format, vehicle_type) = plate_format(&plate);
    vehicle.insert("country".into(), COUNTRY.code().into());
    vehicle.insert("vehicleType".into(), vehicle_type.into());
    vehicle.insert("plateFormat".into(), format.into());
    Ok(())
}

pub fn add_regulatory_information(context: &mut SubmitContext) -> Result<(), ExtensionError> {
    panama_specific(context, |specific| {
        specific.insert(
            "regulatory".into(),
            json!({
                "superintendenciaCode": "SSRP",
                "complianceVersion": "2024.1",
                "dataProtectionLaw": "Ley 81 de 2019",
                "submissionType": "electronic",
            }),
        );
    });
    Ok(())
}

pub fn country_metadata() -> Arc<dyn PayloadMutator> {
    mutator_fn(add_country_metadata)
}

pub fn normalize_tax_id() -> Arc<dyn PayloadMutator> {
    mutator_fn(normalize_dynamic_tax_id)
}

pub fn insurance_zone_information() -> Arc<dyn PayloadMutator> {
    mutator_fn(add_insurance_zone_information)
}

pub fn normalize_amounts() -> Arc<dyn PayloadMutator> {
    mutator_fn(normalize_balboa_amounts)
}

pub fn enrich_vehicle() -> Arc<dyn PayloadMutator> {
    mutator_fn(enrich_vehicle_information)
}

pub fn regulatory_information() -> Arc<dyn PayloadMutator> {
    mutator_fn(add_regulatory_information)
}
