//! Pre-built Test Fixtures
//!
//! Claims shaped like the ones each country's backend returns, and the form
//! data the session hands to the submit pipeline.

use core_kernel::CountryCode;
use domain_claim_info::demo::demo_claim;
use domain_claim_info::ClaimInfoData;
use serde_json::{json, Value};

/// Fixture for claim data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A Costa Rican claim in colones that passes every Costa Rica check
    pub fn costa_rica() -> ClaimInfoData {
        demo_claim(CountryCode::CostaRica)
    }

    /// A Panamanian claim in dollars that passes every Panama check
    pub fn panama() -> ClaimInfoData {
        demo_claim(CountryCode::Panama)
    }
}

/// Fixture for pipeline form data
pub struct FormDataFixtures;

impl FormDataFixtures {
    /// Form data for a valid Costa Rican submission
    pub fn costa_rica() -> Value {
        json!({
            "claimInfo": ClaimFixtures::costa_rica(),
            "dynamicFields": {
                "hasSugef": false,
                "hasSpecialDiscount": false,
            },
            "country": "CR",
            "timestamp": "2024-06-15T12:00:00+00:00",
        })
    }

    /// Form data for a valid Panamanian submission
    pub fn panama() -> Value {
        json!({
            "claimInfo": ClaimFixtures::panama(),
            "dynamicFields": {
                "panamaTaxId": "8-123-456",
                "panamaInsuranceZone": "URBAN",
                "hasPanamaSpecialTax": false,
            },
            "country": "PA",
            "timestamp": "2024-06-15T12:00:00+00:00",
        })
    }

    /// Form data with no claim loaded
    pub fn empty(country: &str) -> Value {
        json!({
            "claimInfo": null,
            "dynamicFields": {},
            "country": country,
            "timestamp": "2024-06-15T12:00:00+00:00",
        })
    }
}

/// Backend responses
pub struct ResponseFixtures;

impl ResponseFixtures {
    pub fn accepted(claim_id: &str) -> Value {
        json!({
            "success": true,
            "claimId": claim_id,
            "message": "Claim submitted successfully",
        })
    }
}
