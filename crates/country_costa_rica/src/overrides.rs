use domain_claim_info::{FieldOverride, FieldOverridesMap, FixedFieldId};

/// Costa Rica's changes to the fixed fields
pub fn field_overrides() -> FieldOverridesMap {
    let mut overrides = FieldOverridesMap::new();
    overrides.insert(
        FixedFieldId::PolicyOwnerRuc.to_string(),
        FieldOverride::new()
            .with_label("Cédula de identidad")
            .with_helper_text("Formato: 0-0000-0000"),
    );
    overrides.insert(
        FixedFieldId::VehiclePlate.to_string(),
        FieldOverride::new()
            .with_label("Número de placa")
            .with_helper_text("Formato: ABC-123 o ABC-1234"),
    );
    overrides.insert(
        FixedFieldId::PolicyDelinquency.to_string(),
        FieldOverride::new()
            .with_required(true)
            .with_label("Días de morosidad"),
    );
    overrides
}
