use domain_claim_info::{FieldOverride, FieldOverridesMap, FixedFieldId};

/// Panama's changes to the fixed fields
pub fn field_overrides() -> FieldOverridesMap {
    let mut overrides = FieldOverridesMap::new();
    overrides.insert(
        FixedFieldId::PolicyOwnerRuc.to_string(),
        FieldOverride::new()
            .with_label("RUC")
            .with_helper_text("Registro Único de Contribuyente"),
    );
    overrides.insert(
        FixedFieldId::VehiclePlate.to_string(),
        FieldOverride::new()
            .with_label("Placa del vehículo")
            .with_helper_text("Formato: 123456"),
    );
    overrides.insert(
        FixedFieldId::Deductible.to_string(),
        FieldOverride::new()
            .with_label("Deducible (Base / Aplicado)")
            .with_helper_text("Incluye impuestos locales"),
    );
    overrides.insert(
        FixedFieldId::Broker.to_string(),
        FieldOverride::new().with_visible(false),
    );
    overrides.insert(
        FixedFieldId::DepreciationPercentage.to_string(),
        FieldOverride::new()
            .with_required(true)
            .with_label("Depreciación anual (%)")
            .with_order(5),
    );
    overrides
}
