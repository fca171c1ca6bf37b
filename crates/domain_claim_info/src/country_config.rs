//! Country configuration bundles
//!
//! A bundle is everything one country contributes: field overrides,
//! dynamic fields, a state extension, country-wide validations and submit
//! extensions. Bundles are produced by a [`CountryLoader`].

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use core_kernel::CountryCode;

use crate::dynamic_fields::DynamicFieldDefinition;
use crate::error::ExtensionError;
use crate::field_config::FieldOverridesMap;
use crate::state::{StateAccess, StateAction, StateFragment, StateMap, StateSlice};
use crate::submit::SubmitExtensions;
use crate::validation::ValidationResult;

/// Additional state and actions a country adds to the store
#[derive(Clone, Default)]
pub struct StateExtension {
    pub initial_state: StateMap,
    /// Without actions the extension is not registered as a slice
    pub actions: Option<IndexMap<String, StateAction>>,
}

impl StateExtension {
    pub fn new(initial_state: StateMap) -> Self {
        Self {
            initial_state,
            actions: None,
        }
    }

    pub fn with_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&dyn StateAccess, Value) -> Result<(), ExtensionError> + Send + Sync + 'static,
    {
        self.actions
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), Arc::new(action));
        self
    }

    pub fn action_names(&self) -> Vec<String> {
        self.actions
            .as_ref()
            .map(|actions| actions.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for StateExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateExtension")
            .field("initial_state", &self.initial_state)
            .field("actions", &self.action_names())
            .finish()
    }
}

/// Slice built from a [`StateExtension`]: its initial values plus actions
pub struct ExtensionSlice {
    extension: StateExtension,
}

impl ExtensionSlice {
    pub fn new(extension: StateExtension) -> Self {
        Self { extension }
    }
}

impl StateSlice for ExtensionSlice {
    fn declared_keys(&self) -> Vec<String> {
        self.extension
            .initial_state
            .keys()
            .cloned()
            .chain(self.extension.action_names())
            .collect()
    }

    fn build(&self, _state: &dyn StateAccess) -> Result<StateFragment, ExtensionError> {
        Ok(StateFragment {
            values: self.extension.initial_state.clone(),
            actions: self.extension.actions.clone().unwrap_or_default(),
        })
    }
}

/// Country-wide validation over the whole form data
pub type GlobalValidation = Arc<dyn Fn(&Value) -> ValidationResult + Send + Sync>;

#[derive(Clone, Default)]
pub struct CountryValidations {
    pub validate_before_submit: Option<GlobalValidation>,
    pub validate_on_load: Option<GlobalValidation>,
}

impl fmt::Debug for CountryValidations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryValidations")
            .field("validate_before_submit", &self.validate_before_submit.is_some())
            .field("validate_on_load", &self.validate_on_load.is_some())
            .finish()
    }
}

/// Everything one country contributes to the form
#[derive(Debug, Clone)]
pub struct CountryConfig {
    pub country_code: CountryCode,
    pub country_name: String,
    pub field_overrides: Option<FieldOverridesMap>,
    pub dynamic_fields: Vec<DynamicFieldDefinition>,
    pub state_extension: Option<StateExtension>,
    pub global_validations: Option<CountryValidations>,
    pub submit_extensions: Option<SubmitExtensions>,
}

impl CountryConfig {
    /// An empty bundle for `country_code`
    pub fn new(country_code: CountryCode) -> Self {
        Self {
            country_code,
            country_name: country_code.name().to_string(),
            field_overrides: None,
            dynamic_fields: Vec::new(),
            state_extension: None,
            global_validations: None,
            submit_extensions: None,
        }
    }

    /// Checks the bundle before anything is registered
    ///
    /// The bundle must be for `expected`, and its dynamic field ids must be
    /// non-empty and unique.
    pub fn validate(&self, expected: CountryCode) -> Result<(), ExtensionError> {
        if self.country_code != expected {
            return Err(ExtensionError::new(format!(
                "loader for {expected} returned a bundle for {}",
                self.country_code
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.dynamic_fields {
            if field.id.trim().is_empty() {
                return Err(ExtensionError::new("dynamic field with an empty id"));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(ExtensionError::new(format!(
                    "dynamic field {} declared more than once",
                    field.id
                )));
            }
        }

        Ok(())
    }

    /// Initial dynamic field values declared by the state extension
    pub fn initial_state(&self) -> StateMap {
        self.state_extension
            .as_ref()
            .map(|ext| ext.initial_state.clone())
            .unwrap_or_default()
    }
}

/// Produces a country's bundle on first use
#[async_trait]
pub trait CountryLoader: Send + Sync {
    async fn load(&self) -> Result<CountryConfig, ExtensionError>;
}

#[async_trait]
impl<F, Fut> CountryLoader for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<CountryConfig, ExtensionError>> + Send,
{
    async fn load(&self) -> Result<CountryConfig, ExtensionError> {
        (self)().await
    }
}
