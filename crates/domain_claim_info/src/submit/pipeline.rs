//! Submit pipeline
//!
//! Runs one submission through four phases:
//! 1. pre-validation: every validator, in order; any invalid result stops
//!    the pipeline before anything is sent
//! 2. payload mutation: every mutator, in order
//! 3. submission: the submitter is called exactly once with the payload
//! 4. post-processing: every handler, in order, with the response
//!
//! Each phase has an [`IsolationPolicy`]. With the defaults, contributor
//! errors are contained in their phase; a submission error always aborts.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use core_kernel::CountryCode;

use super::{
    ClaimSubmitter, PostSubmitResult, SubmitContext, SubmitExtensionRegistry, SubmitPipelineResult,
};
use crate::validation::ValidationResult;

pub const MESSAGE_VALIDATION_FAILED: &str = "Validation errors before submit";
pub const MESSAGE_SUCCESS: &str = "Submit completed successfully";
pub const MESSAGE_POST_FAILURES: &str = "Submit completed but some post-processing steps failed";
pub const MESSAGE_PIPELINE_ERROR: &str = "Error during submit process";

/// Error key used when a validator itself fails
pub const VALIDATOR_ERROR_KEY: &str = "validator_error";
/// Error key used when the pipeline as a whole fails
pub const PIPELINE_ERROR_KEY: &str = "pipeline";

/// What happens when a contributor in a phase returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationPolicy {
    /// Record the error and run the remaining contributors
    #[default]
    ContinueOnError,
    /// Stop the pipeline and report the error under `pipeline`
    AbortOnError,
}

/// Isolation policy per phase; submission errors always abort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelinePolicy {
    pub pre_validators: IsolationPolicy,
    pub payload_mutators: IsolationPolicy,
    pub post_handlers: IsolationPolicy,
}

impl PipelinePolicy {
    /// Every phase aborts on the first contributor error
    pub fn strict() -> Self {
        Self {
            pre_validators: IsolationPolicy::AbortOnError,
            payload_mutators: IsolationPolicy::AbortOnError,
            post_handlers: IsolationPolicy::AbortOnError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    PreValidation,
    PayloadMutation,
    Submission,
    PostProcessing,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::PreValidation => "pre-validation",
            PipelinePhase::PayloadMutation => "payload mutation",
            PipelinePhase::Submission => "submission",
            PipelinePhase::PostProcessing => "post-processing",
        };
        f.write_str(name)
    }
}

/// An error that escaped its phase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{phase} failed: {message}")]
pub struct PipelineError {
    pub phase: PipelinePhase,
    pub message: String,
}

impl PipelineError {
    pub fn new(phase: PipelinePhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }
}

pub struct SubmitPipeline {
    registry: Arc<SubmitExtensionRegistry>,
    policy: PipelinePolicy,
}

impl SubmitPipeline {
    pub fn new(registry: Arc<SubmitExtensionRegistry>) -> Self {
        Self {
            registry,
            policy: PipelinePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PipelinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PipelinePolicy {
        self.policy
    }

    /// Runs the four phases for `country_code` against `form_data`
    #[instrument(skip(self, form_data, submitter), fields(country = %country_code))]
    pub async fn execute(
        &self,
        country_code: CountryCode,
        form_data: Value,
        submitter: &dyn ClaimSubmitter,
    ) -> SubmitPipelineResult {
        let mut context = SubmitContext::new(country_code, form_data);

        match self.run(&mut context, submitter).await {
            Ok(result) => {
                info!(
                    submission_id = %result.submission_id,
                    success = result.success,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "{}",
                    result.message
                );
                result
            }
            Err(error) => {
                warn!(submission_id = %context.submission_id, phase = %error.phase, error = %error.message, "Submit pipeline failed");
                let mut errors = IndexMap::new();
                errors.insert(PIPELINE_ERROR_KEY.to_string(), error.message);
                SubmitPipelineResult {
                    submission_id: context.submission_id,
                    success: false,
                    errors,
                    warnings: context.warnings,
                    response: None,
                    post_results: None,
                    message: MESSAGE_PIPELINE_ERROR.to_string(),
                }
            }
        }
    }

    async fn run(
        &self,
        context: &mut SubmitContext,
        submitter: &dyn ClaimSubmitter,
    ) -> Result<SubmitPipelineResult, PipelineError> {
        let validation = self.run_pre_validators(context).await?;
        if !validation.is_valid {
            warn!(errors = ?validation.errors, "Pre-validation failed");
            return Ok(SubmitPipelineResult {
                submission_id: context.submission_id,
                success: false,
                errors: validation.errors,
                warnings: validation.warnings,
                response: None,
                post_results: None,
                message: MESSAGE_VALIDATION_FAILED.to_string(),
            });
        }
        context.warnings.extend(validation.warnings);

        self.run_payload_mutators(context).await?;

        debug!(payload = %context.payload, "Final payload");
        let response = submitter
            .submit(context.payload.clone())
            .await
            .map_err(|e| PipelineError::new(PipelinePhase::Submission, e.message))?;

        let post_results = self.run_post_handlers(context, &response).await?;
        let has_post_failures = post_results.iter().any(|result| !result.success);

        Ok(SubmitPipelineResult {
            submission_id: context.submission_id,
            success: !has_post_failures,
            errors: context.errors.clone(),
            warnings: context.warnings.clone(),
            response: Some(response),
            post_results: Some(post_results),
            message: if has_post_failures {
                MESSAGE_POST_FAILURES.to_string()
            } else {
                MESSAGE_SUCCESS.to_string()
            },
        })
    }

    async fn run_pre_validators(
        &self,
        context: &mut SubmitContext,
    ) -> Result<ValidationResult, PipelineError> {
        let validators = self.registry.pre_validators(context.country_code);
        let mut combined = ValidationResult::ok();

        for validator in validators {
            match validator.validate(context).await {
                Ok(result) => combined.merge(result),
                Err(error) => match self.policy.pre_validators {
                    IsolationPolicy::ContinueOnError => {
                        warn!(error = %error, "Pre-submit validator failed");
                        combined.add_error(VALIDATOR_ERROR_KEY, error.message);
                    }
                    IsolationPolicy::AbortOnError => {
                        return Err(PipelineError::new(PipelinePhase::PreValidation, error.message));
                    }
                },
            }
        }

        Ok(combined)
    }

    async fn run_payload_mutators(&self, context: &mut SubmitContext) -> Result<(), PipelineError> {
        let mutators = self.registry.payload_mutators(context.country_code);

        for mutator in mutators {
            if let Err(error) = mutator.mutate(context).await {
                match self.policy.payload_mutators {
                    IsolationPolicy::ContinueOnError => {
                        warn!(error = %error, "Payload mutator failed, continuing");
                    }
                    IsolationPolicy::AbortOnError => {
                        return Err(PipelineError::new(PipelinePhase::PayloadMutation, error.message));
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_post_handlers(
        &self,
        context: &mut SubmitContext,
        response: &Value,
    ) -> Result<Vec<PostSubmitResult>, PipelineError> {
        let handlers = self.registry.post_handlers(context.country_code);
        let mut results = Vec::with_capacity(handlers.len());

        for handler in handlers {
            let result = match handler.handle(context, response).await {
                Ok(result) => result,
                Err(error) => match self.policy.post_handlers {
                    IsolationPolicy::ContinueOnError => {
                        warn!(error = %error, "Post-submit handler failed");
                        PostSubmitResult::failed(error.message)
                    }
                    IsolationPolicy::AbortOnError => {
                        return Err(PipelineError::new(PipelinePhase::PostProcessing, error.message));
                    }
                },
            };

            results.push(result);
            let position = results.len();
            if let Some(failed) = results.last().filter(|r| !r.success) {
                if let Some(message) = &failed.message {
                    context
                        .errors
                        .insert(format!("post_handler_{position}"), message.clone());
                }
            }
        }

        Ok(results)
    }
}
