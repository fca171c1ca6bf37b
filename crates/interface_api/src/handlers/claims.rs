//! Claim handlers

use axum::{extract::State, Json};
use domain_claim_info::{ClaimInfoData, SubmitPipelineResult};
use tracing::warn;

use crate::dto::claims::{ClaimResponse, ValidationErrorsResponse};
use crate::{error::ApiError, AppState};

/// Replaces the claim being edited
pub async fn set_claim(
    State(state): State<AppState>,
    Json(data): Json<ClaimInfoData>,
) -> Json<ClaimResponse> {
    let store = state.session.store();
    store.set_claim_info(Some(data), false);
    Json(ClaimResponse {
        claim_info: store.claim_info(),
    })
}

/// The claim being edited
pub async fn get_claim(State(state): State<AppState>) -> Json<ClaimResponse> {
    Json(ClaimResponse {
        claim_info: state.session.store().claim_info(),
    })
}

/// Submits the form through the active country's pipeline
///
/// Rejections and post-submit failures are part of the result, not HTTP
/// errors.
pub async fn submit_claim(State(state): State<AppState>) -> Result<Json<SubmitPipelineResult>, ApiError> {
    if state.session.current_country().is_none() {
        return Err(ApiError::Conflict("No country selected".to_string()));
    }

    match state.session.submit_claim(&state.backend).await {
        Some(result) => Ok(Json(result)),
        None => {
            warn!("Rejected submit while another is in progress");
            Err(ApiError::Conflict("A submit is already in progress".to_string()))
        }
    }
}

/// Validation errors of the last submit
pub async fn validation_errors(State(state): State<AppState>) -> Json<ValidationErrorsResponse> {
    Json(ValidationErrorsResponse {
        validation_errors: state.session.store().validation_errors(),
    })
}
