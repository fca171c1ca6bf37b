//! Form field DTOs

use domain_claim_info::{FieldView, ResolvedFieldConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsResponse {
    /// Visible fixed fields, sorted by order
    pub fields: Vec<ResolvedFieldConfig>,
    /// Dynamic field views keyed by section
    pub dynamic_fields: IndexMap<String, Vec<FieldView>>,
}

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFieldResponse {
    pub field_id: String,
    /// The value after the field's normalization
    pub value: Value,
}
