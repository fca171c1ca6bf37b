//! Country and session DTOs

use core_kernel::{CountryCode, Currency};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryResponse {
    pub code: CountryCode,
    pub name: String,
    pub currency: Currency,
    pub locale: String,
}

impl From<CountryCode> for CountryResponse {
    fn from(country: CountryCode) -> Self {
        Self {
            code: country,
            name: country.name().to_string(),
            currency: country.currency(),
            locale: country.locale().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectCountryRequest {
    #[validate(length(equal = 2, message = "must be a two-letter country code"))]
    pub country_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub current_country: Option<CountryCode>,
    pub country_name: Option<String>,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub error: Option<String>,
}
