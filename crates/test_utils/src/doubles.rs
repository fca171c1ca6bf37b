//! Test Doubles
//!
//! Submitters, loaders and submit extensions with scripted behavior that
//! record what they saw.

use async_trait::async_trait;
use domain_claim_info::{
    ClaimSubmitter, CountryConfig, CountryLoader, ExtensionError, PayloadMutator, PostSubmitHandler,
    PostSubmitResult, PreSubmitValidator, SubmitContext, ValidationResult,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Shared call log; doubles push a label when they run
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: impl Into<String>) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(label.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Backend double that accepts every payload and keeps it
#[derive(Default)]
pub struct RecordingSubmitter {
    payloads: Mutex<Vec<Value>>,
    delay: Duration,
    failure: Option<String>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Rejects every payload with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.payloads.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ClaimSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: Value) -> Result<Value, ExtensionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let count = {
            let mut payloads = self.payloads.lock().unwrap_or_else(PoisonError::into_inner);
            payloads.push(payload.clone());
            payloads.len()
        };
        if let Some(message) = &self.failure {
            return Err(ExtensionError::new(message.clone()));
        }
        Ok(json!({
            "success": true,
            "claimId": format!("CLM-TEST-{count}"),
            "message": "Claim submitted successfully",
            "data": payload,
        }))
    }
}

/// Validator returning a fixed result
pub struct StaticValidator {
    result: Result<ValidationResult, ExtensionError>,
    label: String,
    log: Option<CallLog>,
}

impl StaticValidator {
    pub fn new(result: ValidationResult) -> Self {
        Self {
            result: Ok(result),
            label: "validator".into(),
            log: None,
        }
    }

    pub fn passing() -> Arc<dyn PreSubmitValidator> {
        Arc::new(Self::new(ValidationResult::ok()))
    }

    /// Fails with one error under `key`
    pub fn rejecting(key: &str, message: &str) -> Arc<dyn PreSubmitValidator> {
        Arc::new(Self::new(ValidationResult::fail([(key, message)])))
    }

    /// Returns an error instead of a result
    pub fn throwing(message: &str) -> Arc<dyn PreSubmitValidator> {
        Arc::new(Self {
            result: Err(ExtensionError::new(message)),
            label: "validator".into(),
            log: None,
        })
    }

    pub fn logged(mut self, label: impl Into<String>, log: &CallLog) -> Self {
        self.label = label.into();
        self.log = Some(log.clone());
        self
    }
}

#[async_trait]
impl PreSubmitValidator for StaticValidator {
    async fn validate(&self, _context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
        if let Some(log) = &self.log {
            log.record(&self.label);
        }
        self.result.clone()
    }
}

/// Mutator that sets one payload key, or fails
pub struct KeyMutator {
    key: String,
    value: Value,
    failure: Option<String>,
    log: Option<CallLog>,
}

impl KeyMutator {
    pub fn setting(key: &str, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            failure: None,
            log: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            key: String::new(),
            value: Value::Null,
            failure: Some(message.into()),
            log: None,
        }
    }

    pub fn logged(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn shared(self) -> Arc<dyn PayloadMutator> {
        Arc::new(self)
    }
}

#[async_trait]
impl PayloadMutator for KeyMutator {
    async fn mutate(&self, context: &mut SubmitContext) -> Result<(), ExtensionError> {
        if let Some(log) = &self.log {
            log.record(format!("mutator:{}", self.key));
        }
        if let Some(message) = &self.failure {
            return Err(ExtensionError::new(message.clone()));
        }
        context.set_payload(self.key.clone(), self.value.clone());
        Ok(())
    }
}

/// Post-handler returning a fixed outcome
pub struct StaticHandler {
    outcome: Result<PostSubmitResult, ExtensionError>,
    log: Option<CallLog>,
}

impl StaticHandler {
    pub fn succeeding(message: &str) -> Self {
        Self {
            outcome: Ok(PostSubmitResult::ok(message)),
            log: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Ok(PostSubmitResult::failed(message)),
            log: None,
        }
    }

    pub fn throwing(message: &str) -> Self {
        Self {
            outcome: Err(ExtensionError::new(message)),
            log: None,
        }
    }

    pub fn logged(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn shared(self) -> Arc<dyn PostSubmitHandler> {
        Arc::new(self)
    }
}

#[async_trait]
impl PostSubmitHandler for StaticHandler {
    async fn handle(
        &self,
        _context: &SubmitContext,
        _response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        if let Some(log) = &self.log {
            log.record("handler");
        }
        self.outcome.clone()
    }
}

/// Loader that counts invocations and can wait or fail
pub struct CountingLoader {
    config: Arc<dyn Fn() -> CountryConfig + Send + Sync>,
    calls: Arc<AtomicUsize>,
    delay: Duration,
    failure: Option<String>,
}

impl CountingLoader {
    pub fn new<F>(config: F) -> Self
    where
        F: Fn() -> CountryConfig + Send + Sync + 'static,
    {
        Self {
            config: Arc::new(config),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Handle on the invocation count, usable after the loader is registered
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl CountryLoader for CountingLoader {
    async fn load(&self) -> Result<CountryConfig, ExtensionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(message) => Err(ExtensionError::new(message.clone())),
            None => Ok((self.config)()),
        }
    }
}
