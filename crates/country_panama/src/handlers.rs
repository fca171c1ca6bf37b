//! Panama post-submit handlers

use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use domain_claim_info::{
    ExtensionError, PostSubmitHandler, PostSubmitResult, SubmissionJournal, SubmitContext,
};

use crate::mutators::COUNTRY_LABEL;
use crate::{Options, COUNTRY};

/// Journal log receiving one entry per submission
pub const SUBMIT_LOG: &str = "pa_submit_logs";
/// Certificates stay valid this many days
pub const CERTIFICATE_VALIDITY_DAYS: i64 = 90;

const SUPERINTENDENCY: &str = "Superintendencia de Seguros y Reaseguros de Panamá";

/// Journal statistics key of a zone
pub fn zone_stats_key(zone: &str) -> String {
    format!("pa_zone_stats_{zone}")
}

fn claim_id(response: &Value) -> Value {
    response.get("claimId").cloned().unwrap_or(Value::Null)
}

/// Claim ids and zones print bare, without JSON quotes
fn bare(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lookup(source: &Value, pointer: &str) -> Value {
    source.pointer(pointer).cloned().unwrap_or(Value::Null)
}

fn zone(context: &SubmitContext) -> Value {
    lookup(&context.payload, "/panamaSpecific/insuranceZone")
}

fn tax_id(context: &SubmitContext) -> Value {
    lookup(&context.payload, "/panamaSpecific/taxId")
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
            "ownerName": lookup(&context.form_data, "/claimInfo/policy/Owner/name"),
            "taxId": tax_id(context),
            "insuranceZone": zone(context),
            "plate": lookup(&context.form_data, "/claimInfo/vehicleInformation/plate"),
        });
        let count = self.journal.append(SUBMIT_LOG, entry.clone());
        info!(log = SUBMIT_LOG, entries = count, "Submission recorded");

        Ok(PostSubmitResult::ok("Submit registrado en log de Panamá").with_data(entry))
    }
}

/// Notifies the insurance superintendency
pub struct SuperintendencyNotice {
    delay: Duration,
}

#[async_trait]
impl PostSubmitHandler for SuperintendencyNotice {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        tokio::time::sleep(self.delay).await;

        let notice = json!({
            "entity": SUPERINTENDENCY,
            "claimId": claim_id(response),
            "insuranceZone": zone(context),
            "notifiedAt": Utc::now().to_rfc3339(),
            "status": "notified",
        });
        info!(claim_id = %claim_id(response), "Superintendency notified");

        Ok(PostSubmitResult::ok("Superintendencia notificada").with_data(notice))
    }
}

/// Issues the claim certificate
pub struct ClaimCertificate {
    delay: Duration,
}

#[async_trait]
impl PostSubmitHandler for ClaimCertificate {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        tokio::time::sleep(self.delay).await;

        let now = Utc::now();
        let claim_id = claim_id(response);
        let certificate = json!({
            "claimId": claim_id,
            "certificateNumber": format!("PA-CERT-{}", now.timestamp_millis()),
            "type": "CERTIFICADO_RECLAMO",
            "country": COUNTRY_LABEL,
            "insuranceZone": zone(context),
            "taxId": tax_id(context),
            "generatedAt": now.to_rfc3339(),
            "validUntil": (now + TimeDelta::days(CERTIFICATE_VALIDITY_DAYS)).to_rfc3339(),
            "url": format!("https://storage.example.com/certificates/{}.pdf", bare(&claim_id)),
        });
        info!(claim_id = %claim_id, "Claim certificate generated");

        Ok(PostSubmitResult::ok("Certificado de reclamo generado").with_data(certificate))
    }
}

/// Texts the policy owner a confirmation
pub struct SmsConfirmation {
    delay: Duration,
}

#[async_trait]
impl PostSubmitHandler for SmsConfirmation {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        tokio::time::sleep(self.delay).await;

        let sms = json!({
            "to": "+507-XXXX-XXXX",
            "message": format!(
                "Reclamo {} recibido. Zona: {}",
                bare(&claim_id(response)),
                bare(&zone(context))
            ),
            "sentAt": Utc::now().to_rfc3339(),
            "status": "sent",
        });

        Ok(PostSubmitResult::ok("SMS de confirmación enviado").with_data(sms))
    }
}

/// Counts claims per insurance zone
pub struct ZoneStatistics {
    journal: Arc<SubmissionJournal>,
}

#[async_trait]
impl PostSubmitHandler for ZoneStatistics {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        let Some(zone) = context.payload_str("/panamaSpecific/insuranceZone") else {
            warn!("Submission payload has no insurance zone");
            return Ok(PostSubmitResult::failed("No se pudo determinar la zona de seguro"));
        };

        let key = zone_stats_key(zone);
        let claim_id = claim_id(response);
        let stats = self.journal.update_stats(&key, |current| {
            let count = current
                .and_then(|stats| stats.get("count"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            json!({
                "count": count + 1,
                "lastUpdate": Utc::now().to_rfc3339(),
                "lastClaimId": claim_id,
            })
        });
        info!(zone = zone, stats = %stats, "Zone statistics updated");

        Ok(PostSubmitResult::ok("Estadísticas de zona actualizadas")
            .with_data(json!({ "zone": zone, "stats": stats })))
    }
}

pub fn submission_log(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(SubmissionLog {
        journal: Arc::clone(&options.journal),
    })
}

pub fn superintendency_notice(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(SuperintendencyNotice {
        delay: options.delay(600),
    })
}

pub fn claim_certificate(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(ClaimCertificate {
        delay: options.delay(1000),
    })
}

pub fn sms_confirmation(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(SmsConfirmation {
        delay: options.delay(400),
    })
}

pub fn zone_statistics(options: &Options) -> Arc<dyn PostSubmitHandler> {
    Arc::new(ZoneStatistics {
        journal: Arc::clone(&options.journal),
    })
}
