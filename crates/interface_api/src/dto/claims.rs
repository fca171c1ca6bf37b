//! Claim DTOs

use domain_claim_info::ClaimInfoState;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub claim_info: ClaimInfoState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorsResponse {
    pub validation_errors: IndexMap<String, String>,
}
