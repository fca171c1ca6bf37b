//! Mock claim backend
//!
//! Stands in for the claim service the form submits to: waits, then accepts
//! every payload and echoes it back.

use async_trait::async_trait;
use chrono::Utc;
use domain_claim_info::{ClaimSubmitter, ExtensionError};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

pub const ACCEPTED_MESSAGE: &str = "Claim submitted successfully";

#[derive(Debug, Clone)]
pub struct MockClaimBackend {
    latency: Duration,
}

impl MockClaimBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl ClaimSubmitter for MockClaimBackend {
    async fn submit(&self, payload: Value) -> Result<Value, ExtensionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let now = Utc::now();
        let claim_id = format!("CLM-{}", now.timestamp_millis());
        info!(claim_id = %claim_id, "Mock backend accepted claim");

        Ok(json!({
            "success": true,
            "claimId": claim_id,
            "message": ACCEPTED_MESSAGE,
            "timestamp": now.to_rfc3339(),
            "data": payload,
        }))
    }
}
