//! Test Data Builders
//!
//! Builder patterns for country bundles and form data. Tests specify only
//! the relevant parts and take defaults for the rest.

use core_kernel::CountryCode;
use domain_claim_info::{
    CountryConfig, CountryValidations, DynamicFieldDefinition, FieldConfig, FieldOverride, FieldOverridesMap,
    PayloadMutator, PostSubmitHandler, PreSubmitValidator, StateExtension, SubmitExtensions,
    TextInput, ValidationResult,
};
use serde_json::Value;
use std::sync::Arc;

use crate::fixtures::FormDataFixtures;

/// Builder for constructing country bundles
pub struct CountryConfigBuilder {
    config: CountryConfig,
}

impl CountryConfigBuilder {
    /// Creates an empty bundle for `country`
    pub fn new(country: CountryCode) -> Self {
        Self {
            config: CountryConfig::new(country),
        }
    }

    /// Claims to be a different country than the one it is loaded for
    pub fn with_country_code(mut self, country: CountryCode) -> Self {
        self.config.country_code = country;
        self
    }

    pub fn with_override(mut self, field_id: &str, field_override: FieldOverride) -> Self {
        self.config
            .field_overrides
            .get_or_insert_with(FieldOverridesMap::new)
            .insert(field_id.to_string(), field_override);
        self
    }

    /// Adds a text dynamic field
    pub fn with_text_field(self, id: &str, section: &str, label: &str) -> Self {
        let field = DynamicFieldDefinition::new(
            id,
            section,
            FieldConfig::new(label, false),
            Arc::new(TextInput),
        );
        self.with_dynamic_field(field)
    }

    pub fn with_dynamic_field(mut self, field: DynamicFieldDefinition) -> Self {
        self.config.dynamic_fields.push(field);
        self
    }

    pub fn with_state_extension(mut self, extension: StateExtension) -> Self {
        self.config.state_extension = Some(extension);
        self
    }

    pub fn with_before_submit<F>(mut self, validation: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult + Send + Sync + 'static,
    {
        self.config.global_validations = Some(CountryValidations {
            validate_before_submit: Some(Arc::new(validation)),
            validate_on_load: None,
        });
        self
    }

    pub fn with_pre_validator(mut self, validator: Arc<dyn PreSubmitValidator>) -> Self {
        let extensions = self.config.submit_extensions.take().unwrap_or_default();
        self.config.submit_extensions = Some(extensions.with_pre_validator(validator));
        self
    }

    pub fn with_payload_mutator(mut self, mutator: Arc<dyn PayloadMutator>) -> Self {
        let extensions = self.config.submit_extensions.take().unwrap_or_default();
        self.config.submit_extensions = Some(extensions.with_payload_mutator(mutator));
        self
    }

    pub fn with_post_handler(mut self, handler: Arc<dyn PostSubmitHandler>) -> Self {
        let extensions = self.config.submit_extensions.take().unwrap_or_default();
        self.config.submit_extensions = Some(extensions.with_post_handler(handler));
        self
    }

    pub fn with_submit_extensions(mut self, extensions: SubmitExtensions) -> Self {
        self.config.submit_extensions = Some(extensions);
        self
    }

    pub fn build(self) -> CountryConfig {
        self.config
    }
}

/// Builder for pipeline form data, starting from a country fixture
pub struct FormDataBuilder {
    data: Value,
}

impl FormDataBuilder {
    pub fn costa_rica() -> Self {
        Self {
            data: FormDataFixtures::costa_rica(),
        }
    }

    pub fn panama() -> Self {
        Self {
            data: FormDataFixtures::panama(),
        }
    }

    /// Replaces the value at `pointer`; the parent must exist
    pub fn with(mut self, pointer: &str, value: Value) -> Self {
        if let Some(slot) = self.data.pointer_mut(pointer) {
            *slot = value;
        } else if let Some((parent, key)) = pointer.rsplit_once('/') {
            if let Some(Value::Object(map)) = self.data.pointer_mut(parent) {
                map.insert(key.to_string(), value);
            }
        }
        self
    }

    /// Removes the value at `pointer`
    pub fn without(mut self, pointer: &str) -> Self {
        if let Some((parent, key)) = pointer.rsplit_once('/') {
            if let Some(Value::Object(map)) = self.data.pointer_mut(parent) {
                map.remove(key);
            }
        }
        self
    }

    pub fn build(self) -> Value {
        self.data
    }
}
