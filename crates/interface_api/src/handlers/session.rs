//! Session handlers

use axum::{extract::State, http::StatusCode, Json};
use core_kernel::CountryCode;
use tracing::info;
use validator::Validate;

use crate::dto::session::{SelectCountryRequest, SessionResponse};
use crate::{error::ApiError, AppState};

/// Loads or switches the active country
///
/// A successful switch seeds the store with the country's demo claim.
pub async fn select_country(
    State(state): State<AppState>,
    Json(request): Json<SelectCountryRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;
    let country: CountryCode = request
        .country_code
        .parse()
        .map_err(|err: core_kernel::CoreError| ApiError::NotFound(err.to_string()))?;

    state.session.load_country(country).await?;
    state.session.store().load_demo_claim(country);
    info!(country = %country, "Active country changed");

    Ok(Json(session_response(&state)))
}

/// Clears the active country
pub async fn clear_country(State(state): State<AppState>) -> StatusCode {
    state.session.clear_country();
    state.session.store().set_claim_info(None, false);
    StatusCode::NO_CONTENT
}

/// Current session status
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(session_response(&state))
}

fn session_response(state: &AppState) -> SessionResponse {
    let session = &state.session;
    SessionResponse {
        current_country: session.current_country(),
        country_name: session.country_config().map(|config| config.country_name.clone()),
        is_loading: session.is_loading(),
        is_submitting: session.is_submitting(),
        error: session.error(),
    }
}
