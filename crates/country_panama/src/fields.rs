//! Panama dynamic fields

use std::sync::Arc;

use domain_claim_info::{DynamicFieldDefinition, FieldConfig, FieldPosition, FieldSection};

use crate::components::{InsuranceZoneField, TaxIdField};

pub const TAX_ID: &str = "panamaTaxId";
pub const INSURANCE_ZONE: &str = "panamaInsuranceZone";

/// The insured's tax id, in the policy section
pub fn tax_id_field() -> DynamicFieldDefinition {
    DynamicFieldDefinition::new(
        TAX_ID,
        FieldSection::Policy,
        FieldConfig::new("RUC del Asegurado", true).with_helper_text("Formato: 1234567-1-123456"),
        Arc::new(TaxIdField),
    )
    .at(FieldPosition::Index(7))
}

/// Geographic coverage zone, in the claim section
pub fn insurance_zone_field() -> DynamicFieldDefinition {
    DynamicFieldDefinition::new(
        INSURANCE_ZONE,
        FieldSection::Claim,
        FieldConfig::new("Zona de cobertura", true).with_helper_text("Zona geográfica del seguro"),
        Arc::new(InsuranceZoneField),
    )
    .at(FieldPosition::Index(14))
}
