//! Submit extension points
//!
//! A country hooks into submission with three kinds of contributors, run in
//! registration order by the [`SubmitPipeline`]:
//! - pre-submit validators, which can block the submission
//! - payload mutators, which reshape the payload sent to the backend
//! - post-submit handlers, which react to the backend response

pub mod pipeline;
pub mod registry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use core_kernel::{CountryCode, SubmissionId};

use crate::error::ExtensionError;
use crate::validation::{str_at, ValidationResult};

pub use pipeline::{IsolationPolicy, PipelineError, PipelinePhase, PipelinePolicy, SubmitPipeline};
pub use registry::SubmitExtensionRegistry;

/// Working state of one submission, created fresh per submit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContext {
    pub submission_id: SubmissionId,
    pub country_code: CountryCode,
    pub started_at: DateTime<Utc>,
    /// The form values as submitted
    pub form_data: Value,
    /// What will be sent to the backend; starts as a copy of `form_data`
    pub payload: Value,
    pub errors: IndexMap<String, String>,
    pub warnings: IndexMap<String, String>,
    pub metadata: Map<String, Value>,
}

impl SubmitContext {
    pub fn new(country_code: CountryCode, form_data: Value) -> Self {
        Self {
            submission_id: SubmissionId::new_v7(),
            country_code,
            started_at: Utc::now(),
            payload: form_data.clone(),
            form_data,
            errors: IndexMap::new(),
            warnings: IndexMap::new(),
            metadata: Map::new(),
        }
    }

    /// Looks up a value in the payload by JSON pointer
    pub fn payload_at(&self, pointer: &str) -> Option<&Value> {
        self.payload.pointer(pointer)
    }

    /// Non-empty string in the submitted form data
    pub fn form_str(&self, pointer: &str) -> Option<&str> {
        str_at(&self.form_data, pointer)
    }

    /// Non-empty string in the payload
    pub fn payload_str(&self, pointer: &str) -> Option<&str> {
        str_at(&self.payload, pointer)
    }

    /// Runs `f` on the payload object
    ///
    /// A payload that is not an object is replaced by an empty one first.
    pub fn with_payload_object<R>(&mut self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        if let Value::Object(map) = &mut self.payload {
            return f(map);
        }
        let mut map = Map::new();
        let result = f(&mut map);
        self.payload = Value::Object(map);
        result
    }

    /// Sets a top-level payload key
    pub fn set_payload(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.with_payload_object(|payload| {
            payload.insert(key, value);
        });
    }
}

/// Outcome of one post-submit handler
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostSubmitResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PostSubmitResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Unified outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPipelineResult {
    pub submission_id: SubmissionId,
    pub success: bool,
    pub errors: IndexMap<String, String>,
    pub warnings: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_results: Option<Vec<PostSubmitResult>>,
    pub message: String,
}

/// Validates the context before anything is sent
#[async_trait]
pub trait PreSubmitValidator: Send + Sync {
    async fn validate(&self, context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError>;
}

/// Reshapes `context.payload` before submission
#[async_trait]
pub trait PayloadMutator: Send + Sync {
    async fn mutate(&self, context: &mut SubmitContext) -> Result<(), ExtensionError>;
}

/// Runs after a successful submission
#[async_trait]
pub trait PostSubmitHandler: Send + Sync {
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError>;
}

/// Sends the final payload to the claim backend
#[async_trait]
pub trait ClaimSubmitter: Send + Sync {
    async fn submit(&self, payload: Value) -> Result<Value, ExtensionError>;
}

#[async_trait]
impl<F, Fut> ClaimSubmitter for F
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ExtensionError>> + Send,
{
    async fn submit(&self, payload: Value) -> Result<Value, ExtensionError> {
        (self)(payload).await
    }
}

struct FnValidator<F>(F);

#[async_trait]
impl<F> PreSubmitValidator for FnValidator<F>
where
    F: Fn(&mut SubmitContext) -> Result<ValidationResult, ExtensionError> + Send + Sync,
{
    async fn validate(&self, context: &mut SubmitContext) -> Result<ValidationResult, ExtensionError> {
        (self.0)(context)
    }
}

struct FnMutator<F>(F);

#[async_trait]
impl<F> PayloadMutator for FnMutator<F>
where
    F: Fn(&mut SubmitContext) -> Result<(), ExtensionError> + Send + Sync,
{
    async fn mutate(&self, context: &mut SubmitContext) -> Result<(), ExtensionError> {
        (self.0)(context)
    }
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> PostSubmitHandler for FnHandler<F>
where
    F: Fn(&SubmitContext, &Value) -> Result<PostSubmitResult, ExtensionError> + Send + Sync,
{
    async fn handle(
        &self,
        context: &SubmitContext,
        response: &Value,
    ) -> Result<PostSubmitResult, ExtensionError> {
        (self.0)(context, response)
    }
}

/// Wraps a synchronous closure as a pre-submit validator
pub fn validator_fn<F>(f: F) -> Arc<dyn PreSubmitValidator>
where
    F: Fn(&mut SubmitContext) -> Result<ValidationResult, ExtensionError> + Send + Sync + 'static,
{
    Arc::new(FnValidator(f))
}

/// Wraps a synchronous closure as a payload mutator
pub fn mutator_fn<F>(f: F) -> Arc<dyn PayloadMutator>
where
    F: Fn(&mut SubmitContext) -> Result<(), ExtensionError> + Send + Sync + 'static,
{
    Arc::new(FnMutator(f))
}

/// Wraps a synchronous closure as a post-submit handler
pub fn handler_fn<F>(f: F) -> Arc<dyn PostSubmitHandler>
where
    F: Fn(&SubmitContext, &Value) -> Result<PostSubmitResult, ExtensionError> + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

/// A country's submit contributors, in execution order
#[derive(Clone, Default)]
pub struct SubmitExtensions {
    pub pre_validators: Vec<Arc<dyn PreSubmitValidator>>,
    pub payload_mutators: Vec<Arc<dyn PayloadMutator>>,
    pub post_handlers: Vec<Arc<dyn PostSubmitHandler>>,
}

impl SubmitExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pre_validator(mut self, validator: Arc<dyn PreSubmitValidator>) -> Self {
        self.pre_validators.push(validator);
        self
    }

    pub fn with_payload_mutator(mut self, mutator: Arc<dyn PayloadMutator>) -> Self {
        self.payload_mutators.push(mutator);
        self
    }

    pub fn with_post_handler(mut self, handler: Arc<dyn PostSubmitHandler>) -> Self {
        self.post_handlers.push(handler);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pre_validators.is_empty() && self.payload_mutators.is_empty() && self.post_handlers.is_empty()
    }
}

impl fmt::Debug for SubmitExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitExtensions")
            .field("pre_validators", &self.pre_validators.len())
            .field("payload_mutators", &self.payload_mutators.len())
            .field("post_handlers", &self.post_handlers.len())
            .finish()
    }
}
