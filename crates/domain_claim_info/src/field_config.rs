//! Field configuration resolver
//!
//! Every fixed form field has exactly one default entry. A country bundle
//! contributes partial overrides; resolving merges them over the defaults
//! without ever touching the default table.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ClaimInfoError;

/// Order used for fields that declare none; they sort last
pub const ORDER_SENTINEL: i32 = 999;

/// Outcome of a field-level validation function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Valid,
    Invalid,
    /// Invalid, with a message to show next to the field
    Message(String),
}

/// Field-level validation function
pub type FieldValidator = Arc<dyn Fn(&Value) -> FieldCheck + Send + Sync>;

/// Section of the form a field belongs to
///
/// Unrecognized sections are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldSection {
    Policy,
    Claim,
    Other(String),
}

impl FieldSection {
    pub fn as_str(&self) -> &str {
        match self {
            FieldSection::Policy => "policy",
            FieldSection::Claim => "claim",
            FieldSection::Other(name) => name,
        }
    }
}

impl From<String> for FieldSection {
    fn from(value: String) -> Self {
        match value.as_str() {
            "policy" => FieldSection::Policy,
            "claim" => FieldSection::Claim,
            _ => FieldSection::Other(value),
        }
    }
}

impl From<&str> for FieldSection {
    fn from(value: &str) -> Self {
        FieldSection::from(value.to_string())
    }
}

impl From<FieldSection> for String {
    fn from(section: FieldSection) -> Self {
        section.as_str().to_string()
    }
}

impl fmt::Display for FieldSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers of the fields every country's form contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixedFieldId {
    // Policy data
    PolicyOwnerName,
    PolicyOwnerRuc,
    VehicleModel,
    VehiclePlate,
    VehicleChassis,
    VehicleYear,
    // Claim data
    DriverGender,
    DriverBirthday,
    Deductible,
    InsuredAmount,
    TotalLossPercentage,
    PolicyDelinquency,
    FriendlyPact,
    DepreciationPercentage,
    PlanType,
    Coverage,
    Broker,
    Creditor,
    DeductiblePayment,
}

impl FixedFieldId {
    /// Every fixed field, in default declaration order
    pub const ALL: [FixedFieldId; 19] = [
        FixedFieldId::PolicyOwnerName,
        FixedFieldId::PolicyOwnerRuc,
        FixedFieldId::VehicleModel,
        FixedFieldId::VehiclePlate,
        FixedFieldId::VehicleChassis,
        FixedFieldId::VehicleYear,
        FixedFieldId::DriverGender,
        FixedFieldId::DriverBirthday,
        FixedFieldId::Deductible,
        FixedFieldId::InsuredAmount,
        FixedFieldId::TotalLossPercentage,
        FixedFieldId::PolicyDelinquency,
        FixedFieldId::FriendlyPact,
        FixedFieldId::DepreciationPercentage,
        FixedFieldId::PlanType,
        FixedFieldId::Coverage,
        FixedFieldId::Broker,
        FixedFieldId::Creditor,
        FixedFieldId::DeductiblePayment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixedFieldId::PolicyOwnerName => "policyOwnerName",
            FixedFieldId::PolicyOwnerRuc => "policyOwnerRuc",
            FixedFieldId::VehicleModel => "vehicleModel",
            FixedFieldId::VehiclePlate => "vehiclePlate",
            FixedFieldId::VehicleChassis => "vehicleChassis",
            FixedFieldId::VehicleYear => "vehicleYear",
            FixedFieldId::DriverGender => "driverGender",
            FixedFieldId::DriverBirthday => "driverBirthday",
            FixedFieldId::Deductible => "deductible",
            FixedFieldId::InsuredAmount => "insuredAmount",
            FixedFieldId::TotalLossPercentage => "totalLossPercentage",
            FixedFieldId::PolicyDelinquency => "policyDelinquency",
            FixedFieldId::FriendlyPact => "friendlyPact",
            FixedFieldId::DepreciationPercentage => "depreciationPercentage",
            FixedFieldId::PlanType => "planType",
            FixedFieldId::Coverage => "coverage",
            FixedFieldId::Broker => "broker",
            FixedFieldId::Creditor => "creditor",
            FixedFieldId::DeductiblePayment => "deductiblePayment",
        }
    }

    /// Returns the form section the field is rendered in
    pub fn section(&self) -> FieldSection {
        match self {
            FixedFieldId::PolicyOwnerName
            | FixedFieldId::PolicyOwnerRuc
            | FixedFieldId::VehicleModel
            | FixedFieldId::VehiclePlate
            | FixedFieldId::VehicleChassis
            | FixedFieldId::VehicleYear => FieldSection::Policy,
            _ => FieldSection::Claim,
        }
    }
}

impl fmt::Display for FixedFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixedFieldId {
    type Err = ClaimInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixedFieldId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ClaimInfoError::UnknownField(s.to_string()))
    }
}

/// Presentation and validation settings of one form field
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub label: String,
    pub required: bool,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip)]
    pub validation: Option<FieldValidator>,
}

impl FieldConfig {
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            required,
            visible: true,
            order: None,
            helper_text: None,
            validation: None,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = Some(text.into());
        self
    }

    pub fn with_validation<F>(mut self, validation: F) -> Self
    where
        F: Fn(&Value) -> FieldCheck + Send + Sync + 'static,
    {
        self.validation = Some(Arc::new(validation));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Order used for sorting, with the sentinel for unordered fields
    pub fn effective_order(&self) -> i32 {
        self.order.unwrap_or(ORDER_SENTINEL)
    }

    /// Runs the validation function, if any, against `value`
    pub fn check(&self, value: &Value) -> FieldCheck {
        match &self.validation {
            Some(validate) => validate(value),
            None => FieldCheck::Valid,
        }
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("visible", &self.visible)
            .field("order", &self.order)
            .field("helper_text", &self.helper_text)
            .field("validation", &self.validation.is_some())
            .finish()
    }
}

impl PartialEq for FieldConfig {
    fn eq(&self, other: &Self) -> bool {
        let same_validation = match (&self.validation, &other.validation) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.label == other.label
            && self.required == other.required
            && self.visible == other.visible
            && self.order == other.order
            && self.helper_text == other.helper_text
            && same_validation
    }
}

/// Partial field configuration; `None` keeps the default
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip)]
    pub validation: Option<FieldValidator>,
}

impl FieldOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = Some(text.into());
        self
    }

    pub fn with_validation<F>(mut self, validation: F) -> Self
    where
        F: Fn(&Value) -> FieldCheck + Send + Sync + 'static,
    {
        self.validation = Some(Arc::new(validation));
        self
    }
}

impl fmt::Debug for FieldOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOverride")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("visible", &self.visible)
            .field("order", &self.order)
            .field("helper_text", &self.helper_text)
            .field("validation", &self.validation.is_some())
            .finish()
    }
}

/// Field configurations keyed by field id, in declaration order
pub type FieldConfigMap = IndexMap<String, FieldConfig>;

/// Partial overrides keyed by field id
pub type FieldOverridesMap = IndexMap<String, FieldOverride>;

/// A merged configuration tagged with its field id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFieldConfig {
    pub field_id: String,
    #[serde(flatten)]
    pub config: FieldConfig,
}

static DEFAULT_FIELD_CONFIGS: Lazy<FieldConfigMap> = Lazy::new(|| {
    use FixedFieldId::*;

    let table: [(FixedFieldId, &str, bool, i32); 19] = [
        (PolicyOwnerName, "Nombre", true, 1),
        (PolicyOwnerRuc, "Cédula", true, 2),
        (VehicleModel, "Modelo del auto", true, 3),
        (VehiclePlate, "Nro. de placa", true, 4),
        (VehicleChassis, "Nro. de chasis", true, 5),
        (VehicleYear, "Año del auto", true, 6),
        (DriverGender, "Género de conductor", true, 1),
        (DriverBirthday, "Fecha de nacimiento de conductor", true, 2),
        (Deductible, "Deducible / Deducible calculado", true, 3),
        (InsuredAmount, "Suma asegurada", true, 4),
        (TotalLossPercentage, "Porcentaje de pérdida total", false, 5),
        (PolicyDelinquency, "Morosidad de la póliza", false, 6),
        (FriendlyPact, "Pacto amistoso", false, 7),
        (DepreciationPercentage, "Porcentaje de depreciación", false, 8),
        (PlanType, "Tipo de plan", true, 9),
        (Coverage, "Cobertura", true, 10),
        (Broker, "Corredor de seguro", false, 11),
        (Creditor, "Acreedor", false, 12),
        (DeductiblePayment, "Pago de deducible", false, 13),
    ];

    table
        .into_iter()
        .map(|(id, label, required, order)| {
            (id.as_str().to_string(), FieldConfig::new(label, required).with_order(order))
        })
        .collect()
});

/// The default configuration of every fixed field
pub fn default_field_configs() -> &'static FieldConfigMap {
    &DEFAULT_FIELD_CONFIGS
}

/// The default configuration of one field, if it is a fixed field
pub fn default_field_config(field_id: &str) -> Option<&'static FieldConfig> {
    DEFAULT_FIELD_CONFIGS.get(field_id)
}

/// Shallow merge: every field set in `overrides` replaces the default's
pub fn merge_field_config(default: &FieldConfig, overrides: Option<&FieldOverride>) -> FieldConfig {
    let mut merged = default.clone();
    let Some(overrides) = overrides else {
        return merged;
    };

    if let Some(label) = &overrides.label {
        merged.label = label.clone();
    }
    if let Some(required) = overrides.required {
        merged.required = required;
    }
    if let Some(visible) = overrides.visible {
        merged.visible = visible;
    }
    if let Some(order) = overrides.order {
        merged.order = Some(order);
    }
    if let Some(helper_text) = &overrides.helper_text {
        merged.helper_text = Some(helper_text.clone());
    }
    if let Some(validation) = &overrides.validation {
        merged.validation = Some(Arc::clone(validation));
    }
    merged
}

/// Resolves every fixed field, in default declaration order
///
/// Override entries for ids without a default are ignored.
pub fn merge_all_field_configs(overrides: Option<&FieldOverridesMap>) -> FieldConfigMap {
    DEFAULT_FIELD_CONFIGS
        .iter()
        .map(|(field_id, default)| {
            let field_override = overrides.and_then(|o| o.get(field_id));
            (field_id.clone(), merge_field_config(default, field_override))
        })
        .collect()
}

/// Resolves a single fixed field
pub fn resolved_field_config(
    field_id: &str,
    overrides: Option<&FieldOverridesMap>,
) -> Result<ResolvedFieldConfig, ClaimInfoError> {
    let default = DEFAULT_FIELD_CONFIGS
        .get(field_id)
        .ok_or_else(|| ClaimInfoError::UnknownField(field_id.to_string()))?;
    let field_override = overrides.and_then(|o| o.get(field_id));

    Ok(ResolvedFieldConfig {
        field_id: field_id.to_string(),
        config: merge_field_config(default, field_override),
    })
}

pub fn visible_fields(configs: &FieldConfigMap) -> FieldConfigMap {
    configs
        .iter()
        .filter(|(_, config)| config.visible)
        .map(|(id, config)| (id.clone(), config.clone()))
        .collect()
}

/// Stable ascending sort by `order`
pub fn sort_fields_by_order(configs: &FieldConfigMap) -> Vec<(String, FieldConfig)> {
    let mut fields: Vec<(String, FieldConfig)> = configs
        .iter()
        .map(|(id, config)| (id.clone(), config.clone()))
        .collect();
    fields.sort_by_key(|(_, config)| config.effective_order());
    fields
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Ids of required, visible fields whose value is missing, null or empty
pub fn validate_required_fields(configs: &FieldConfigMap, values: &Map<String, Value>) -> Vec<String> {
    configs
        .iter()
        .filter(|(_, config)| config.required && config.visible)
        .filter(|(field_id, _)| is_blank(values.get(field_id.as_str())))
        .map(|(field_id, _)| field_id.clone())
        .collect()
}

/// Runs field-level validation functions against the present values
///
/// Returns a message per failing field id. Blank values are left to
/// [`validate_required_fields`].
pub fn validate_field_values(
    configs: &FieldConfigMap,
    values: &Map<String, Value>,
) -> IndexMap<String, String> {
    let mut errors = IndexMap::new();

    for (field_id, config) in configs {
        let Some(value) = values.get(field_id.as_str()) else {
            continue;
        };
        if is_blank(Some(value)) {
            continue;
        }

        match config.check(value) {
            FieldCheck::Valid => {}
            FieldCheck::Invalid => {
                errors.insert(field_id.clone(), format!("{} no es válido", config.label));
            }
            FieldCheck::Message(message) => {
                errors.insert(field_id.clone(), message);
            }
        }
    }

    errors
}
