//! Claim form session
//!
//! The active-country context of a form: which country is loaded, its
//! resolved field configuration and load error, plus the guarded submit
//! entry point.

use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use core_kernel::CountryCode;

use crate::country_config::CountryConfig;
use crate::dynamic_fields::{DynamicFieldDefinition, FieldView};
use crate::error::ClaimInfoError;
use crate::factory::CountryConfigFactory;
use crate::field_config::{
    merge_all_field_configs, sort_fields_by_order, visible_fields, FieldConfigMap, FieldSection,
    ResolvedFieldConfig,
};
use crate::state::CombinedState;
use crate::store::ClaimInfoStore;
use crate::submit::{ClaimSubmitter, PipelinePolicy, SubmitPipeline, SubmitPipelineResult};
use crate::validation::ValidationResult;

#[derive(Default)]
struct SessionContext {
    current_country: Option<CountryCode>,
    requested_country: Option<CountryCode>,
    request_generation: u64,
    country_config: Option<Arc<CountryConfig>>,
    resolved_field_configs: Option<FieldConfigMap>,
    is_loading: bool,
    error: Option<String>,
}

/// Resets the in-flight flag when the submit finishes
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ClaimFormSession {
    factory: Arc<CountryConfigFactory>,
    store: Arc<ClaimInfoStore>,
    pipeline: SubmitPipeline,
    context: RwLock<SessionContext>,
    /// Country whose contributions the factory registries hold
    registered: Mutex<Option<CountryCode>>,
    submitting: AtomicBool,
}

impl ClaimFormSession {
    pub fn new(factory: Arc<CountryConfigFactory>, store: Arc<ClaimInfoStore>) -> Self {
        let pipeline = SubmitPipeline::new(Arc::clone(factory.submit_extensions()));
        Self {
            factory,
            store,
            pipeline,
            context: RwLock::default(),
            registered: Mutex::new(None),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn with_pipeline_policy(mut self, policy: PipelinePolicy) -> Self {
        self.pipeline = self.pipeline.with_policy(policy);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionContext> {
        self.context.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionContext> {
        self.context.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn factory(&self) -> &Arc<CountryConfigFactory> {
        &self.factory
    }

    pub fn store(&self) -> &Arc<ClaimInfoStore> {
        &self.store
    }

    /// Loads `country` and makes it the active country
    ///
    /// Requesting a country other than the pending or active one clears the
    /// factory first, so the previous country's fields and extensions are
    /// gone. Loads run one at a time; a load overtaken by a newer request
    /// returns `LoadSuperseded` and leaves the session untouched. On failure
    /// the active configuration is cleared and the message kept in `error`.
    pub async fn load_country(&self, country: CountryCode) -> Result<Arc<CountryConfig>, ClaimInfoError> {
        let (request, switching) = {
            let mut context = self.write();
            let previous = context.requested_country.or(context.current_country);
            context.request_generation += 1;
            context.requested_country = Some(country);
            context.is_loading = true;
            context.error = None;
            (context.request_generation, previous.is_some_and(|previous| previous != country))
        };

        if switching {
            self.factory.clear_cache();
        }

        let mut registered = self.registered.lock().await;
        if self.is_superseded(request) {
            debug!(country = %country, "Load request overtaken before it started");
            return Err(ClaimInfoError::LoadSuperseded(country));
        }
        // An overtaken load may have committed after the clear above.
        if registered.is_some_and(|previous| previous != country) {
            self.factory.clear_cache();
            *registered = None;
        }

        let loaded = self.factory.load_country_config(country).await;
        if loaded.is_ok() {
            *registered = Some(country);
        }

        match loaded {
            Ok(config) => {
                let resolved = merge_all_field_configs(config.field_overrides.as_ref());

                self.store.clear_validation_errors();
                let combined = self.factory.state_extensions().combine_slices(self.store.as_ref());
                self.store.install_extensions(combined);
                self.store.initialize_dynamic_fields(config.initial_state());

                let mut context = self.write();
                if context.request_generation != request {
                    debug!(country = %country, "Discarding overtaken country load");
                    return Err(ClaimInfoError::LoadSuperseded(country));
                }
                context.current_country = Some(country);
                context.requested_country = None;
                context.country_config = Some(Arc::clone(&config));
                context.resolved_field_configs = Some(resolved);
                context.is_loading = false;

                info!(country = %country, "Country configuration loaded: {}", config.country_name);
                Ok(config)
            }
            Err(error) => {
                let mut context = self.write();
                if context.request_generation != request {
                    debug!(country = %country, error = %error, "Discarding overtaken country load failure");
                    return Err(error);
                }
                warn!(country = %country, error = %error, "Failed to load country configuration");
                context.current_country = None;
                context.requested_country = None;
                context.country_config = None;
                context.resolved_field_configs = None;
                context.is_loading = false;
                context.error = Some(error.to_string());
                Err(error)
            }
        }
    }

    fn is_superseded(&self, request: u64) -> bool {
        self.read().request_generation != request
    }

    /// Drops the active country and everything it contributed
    pub fn clear_country(&self) {
        {
            let mut context = self.write();
            let request_generation = context.request_generation + 1;
            *context = SessionContext {
                request_generation,
                ..SessionContext::default()
            };
        }
        self.factory.clear_cache();
        self.store.install_extensions(CombinedState::default());
        self.store.clear_validation_errors();
    }

    pub fn current_country(&self) -> Option<CountryCode> {
        self.read().current_country
    }

    pub fn country_config(&self) -> Option<Arc<CountryConfig>> {
        self.read().country_config.clone()
    }

    pub fn resolved_field_configs(&self) -> Option<FieldConfigMap> {
        self.read().resolved_field_configs.clone()
    }

    /// Visible fixed fields of the active country, sorted by order
    pub fn form_fields(&self) -> Vec<ResolvedFieldConfig> {
        let Some(configs) = self.resolved_field_configs() else {
            return Vec::new();
        };
        sort_fields_by_order(&visible_fields(&configs))
            .into_iter()
            .map(|(field_id, config)| ResolvedFieldConfig { field_id, config })
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn dynamic_fields(&self, section: &FieldSection) -> Vec<DynamicFieldDefinition> {
        self.factory.dynamic_fields().get_by_section(section)
    }

    /// Render descriptions of a section's dynamic fields with their values
    pub fn dynamic_field_views(&self, section: &FieldSection) -> Vec<FieldView> {
        let is_loading = self.is_loading() || self.store.claim_info().is_loading;
        let disabled = self.is_submitting();
        self.dynamic_fields(section)
            .into_iter()
            .map(|field| {
                let value = self.store.dynamic_field_value(&field.id).unwrap_or(Value::Null);
                field.view(value, is_loading, disabled)
            })
            .collect()
    }

    /// Normalizes `raw` through the field's component and stores it
    pub fn set_dynamic_field(&self, field_id: &str, raw: Value) -> Result<Value, ClaimInfoError> {
        let field = self
            .factory
            .dynamic_fields()
            .get(field_id)
            .ok_or_else(|| ClaimInfoError::UnknownField(field_id.to_string()))?;
        let value = field.component.on_change(raw);
        self.store.set_dynamic_field_value(field_id, value.clone());
        Ok(value)
    }

    /// Runs the active country's pre-submit global validation
    pub fn run_global_validations(&self, data: &Value) -> ValidationResult {
        self.country_config()
            .and_then(|config| config.global_validations.clone())
            .and_then(|validations| validations.validate_before_submit)
            .map(|validate| validate(data))
            .unwrap_or_else(ValidationResult::ok)
    }

    /// Runs the active country's on-load global validation
    pub fn run_load_validations(&self, data: &Value) -> ValidationResult {
        self.country_config()
            .and_then(|config| config.global_validations.clone())
            .and_then(|validations| validations.validate_on_load)
            .map(|validate| validate(data))
            .unwrap_or_else(ValidationResult::ok)
    }

    /// The form data handed to the pipeline
    pub fn form_data(&self, country: CountryCode) -> Value {
        json!({
            "claimInfo": self.store.claim_info().data,
            "dynamicFields": self.store.dynamic_fields_data(),
            "country": country,
            "timestamp": Utc::now().to_rfc3339(),
        })
    }

    /// Submits the current form through the pipeline
    ///
    /// Returns `None` without an active country or while another submit is
    /// in flight.
    pub async fn submit_claim(&self, submitter: &dyn ClaimSubmitter) -> Option<SubmitPipelineResult> {
        let Some(country) = self.current_country() else {
            warn!("Submit requested with no active country");
            return None;
        };

        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(country = %country, "Submit already in progress, ignoring");
            return None;
        }
        let _guard = SubmitGuard(&self.submitting);

        self.store.clear_validation_errors();
        let form_data = self.form_data(country);
        let result = self.pipeline.execute(country, form_data, submitter).await;

        if !result.success && !result.errors.is_empty() {
            self.store.set_validation_errors(result.errors.clone());
        } else {
            self.store.clear_validation_errors();
        }

        Some(result)
    }
}
