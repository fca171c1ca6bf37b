//! Claim information as delivered by the claim backend
//!
//! Field names follow the backend's JSON, including its capitalized
//! `Owner`, `Broker`, `FullName`, `Base` and `Calculated` keys.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub name: String,
    pub last_name: String,
    pub ruc: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Broker {
    #[serde(rename = "FullName")]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub coverage_code: String,
    pub description: String,
    /// Insured amount as sent by the backend, a numeric string
    pub insured_amount: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_number: String,
    #[serde(rename = "Owner")]
    pub owner: Owner,
    #[serde(rename = "Broker")]
    pub broker: Broker,
    pub coverages: Vec<Coverage>,
    pub pay_overdue_days: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInformation {
    pub model: String,
    pub plate: String,
    pub serial_chassis: String,
    pub year: i32,
    pub depreciation: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    pub last_name: String,
    pub gender: String,
    pub birthday: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_number: String,
    /// `NONE`, `APPLY` or another backend code
    pub fud: String,
    pub driver: Driver,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deductible {
    #[serde(rename = "Base")]
    pub base: f64,
    #[serde(rename = "Calculated")]
    pub calculated: f64,
    #[serde(rename = "exoneratedByAnalyst")]
    pub exonerated_by_analyst: bool,
}

/// The claim being edited in the form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfoData {
    pub policy: Policy,
    pub vehicle_information: VehicleInformation,
    pub claim: Claim,
    pub deductible: Deductible,
    pub coverage_code: String,
    pub endorsement: String,
    pub total_loss_percentage: String,
    pub creditor: String,
    pub deductible_payment: String,
    pub total_claim_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ClaimInfoData {
    /// Returns the coverage matching `coverage_code`, if any
    pub fn selected_coverage(&self) -> Option<&Coverage> {
        self.policy
            .coverages
            .iter()
            .find(|c| c.coverage_code == self.coverage_code)
    }
}

/// Claim data plus its loading flag, as held by the store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfoState {
    pub data: Option<ClaimInfoData>,
    pub is_loading: bool,
}
