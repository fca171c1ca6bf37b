//! Country catalogue handlers

use axum::{extract::State, Json};

use crate::dto::session::CountryResponse;
use crate::AppState;

/// Lists the countries with a registered extension
pub async fn list_countries(State(state): State<AppState>) -> Json<Vec<CountryResponse>> {
    let factory = state.session.factory();
    let countries = factory
        .supported_countries()
        .into_iter()
        .filter(|country| factory.has_loader(*country))
        .map(CountryResponse::from)
        .collect();
    Json(countries)
}
