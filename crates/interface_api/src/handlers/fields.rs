//! Form field handlers

use axum::{
    extract::{Path, State},
    Json,
};
use domain_claim_info::FieldSection;
use indexmap::IndexMap;

use crate::dto::fields::{FieldsResponse, SetFieldRequest, SetFieldResponse};
use crate::{error::ApiError, AppState};

/// Resolved fixed fields and dynamic field views of the active country
pub async fn list_fields(State(state): State<AppState>) -> Json<FieldsResponse> {
    let session = &state.session;

    let mut sections: Vec<FieldSection> = Vec::new();
    for field in session.factory().dynamic_fields().get_all() {
        if !sections.contains(&field.section) {
            sections.push(field.section);
        }
    }

    let dynamic_fields: IndexMap<_, _> = sections
        .iter()
        .map(|section| (section.to_string(), session.dynamic_field_views(section)))
        .collect();

    Json(FieldsResponse {
        fields: session.form_fields(),
        dynamic_fields,
    })
}

/// Sets a dynamic field value through its component
pub async fn set_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<SetFieldResponse>, ApiError> {
    let value = state.session.set_dynamic_field(&field_id, request.value)?;
    Ok(Json(SetFieldResponse { field_id, value }))
}
