//! Costa Rica post-submit handlers

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use domain_claim_info::{
    ExtensionError, PostSubmitHandler, PostSubmitResult, SubmissionJournal, SubmitContext,
};

use crate::{Options, COUNTRY};

/// Journal log receiving one entry per submission
pub const SUBMIT_LOG: &str = "cr_submit_logs";

fn claim_id(response: &Value) -> Value {
    response.get("claimId").cloned().unwrap_or(Value::Null)
}

fn form_value(context: &SubmitContext, pointer: &str) -> Value {
    context
        .form_data
        .pointer(pointer)
        .cloned()
        .unwrap_or(Value::Null)
}

/// Records the submission in the journal
pub struct SubmissionLog {
    journal: Arc<SubmissionJournal>,
}

#[async_trait]
impl PostSubmitHandler for SubmissionLog {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "country": COUNTRY.code(),
            "claimId": claim_id(response),
            "ownerName": form_value(context, "/claimInfo/policy/Owner/name"),
            "plate": form_value(context, "/claimInfo/vehicleInformation/plate"),
        });
        let count = self.journal.append(SUBMIT_LOG, entry.clone());
        info!(log = SUBMIT_LOG, entries = count, "Submission recorded");

        Ok(PostSubmitResult::ok("Submit registrado en log local").with_data(entry))
    }
}

/// Notifies the policy owner that the claim went through
pub struct ConfirmationNotification {
    delay: Duration,
}

#[async_trait]
impl PostSubmitHandler for ConfirmationNotification {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        tokio::time::sleep(self.delay).await;

        let claim_id = claim_id(response);
        let notification = json!({
            "to": form_value(context, "/claimInfo/policy/Owner/name"),
            "message": format!("Su reclamo {} ha sido enviado exitosamente", display(&claim_id)),
            "country": COUNTRY.name(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        info!(claim_id = %claim_id, "Confirmation notification sent");

        Ok(PostSubmitResult::ok("Notificación enviada").with_data(notification))
    }
}

/// Produces the claim's PDF document
pub struct ClaimDocument {
    delay: Duration,
}

#[async_trait]
impl PostSubmitHandler for ClaimDocument {
    async fn handle(
        &self,
        _context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        tokio::time::sleep(self.delay).await;

        let claim_id = claim_id(response);
        let document = json!({
            "claimId": claim_id,
            "documentType": "PDF",
            "generatedAt": Utc::now().to_rfc3339(),
            "country": COUNTRY.name(),
            "url": format!("https://storage.example.com/claims/{}.pdf", display(&claim_id)),
        });
        info!(claim_id = %claim_id, "Claim document generated");

        Ok(PostSubmitResult::ok("Documento generado").with_data(document))
    }
}

/// Claim ids print bare, without JSON quotes
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn submission_log(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(SubmissionLog {
        journal: Arc::clone(&options.journal),
    })
}

pub fn confirmation_notification(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(ConfirmationNotification {
        delay: options.delay(500),
    })
}

pub fn claim_document(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(ClaimDocument {
        delay: options.delay(800),
    })
}
