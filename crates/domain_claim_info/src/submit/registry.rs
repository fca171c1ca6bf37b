//! Submit extension registry
//!
//! Per country, three ordered lists. Registration order is execution
//! order.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use core_kernel::CountryCode;

use super::{PayloadMutator, PostSubmitHandler, PreSubmitValidator, SubmitExtensions};

#[derive(Default)]
pub struct SubmitExtensionRegistry {
    countries: RwLock<HashMap<CountryCode, SubmitExtensions>>,
}

impl SubmitExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CountryCode, SubmitExtensions>> {
        self.countries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CountryCode, SubmitExtensions>> {
        self.countries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces all three lists of `country` with the bundle's
    pub fn register_country_extensions(&self, country: CountryCode, extensions: SubmitExtensions) {
        debug!(
            country = %country,
            pre_validators = extensions.pre_validators.len(),
            payload_mutators = extensions.payload_mutators.len(),
            post_handlers = extensions.post_handlers.len(),
            "Registering submit extensions"
        );
        let mut countries = self.write();
        if extensions.is_empty() {
            countries.remove(&country);
        } else {
            countries.insert(country, extensions);
        }
    }

    pub fn register_pre_validator(&self, country: CountryCode, validator: Arc<dyn PreSubmitValidator>) {
        self.write().entry(country).or_default().pre_validators.push(validator);
    }

    pub fn register_payload_mutator(&self, country: CountryCode, mutator: Arc<dyn PayloadMutator>) {
        self.write().entry(country).or_default().payload_mutators.push(mutator);
    }

    pub fn register_post_handler(&self, country: CountryCode, handler: Arc<dyn PostSubmitHandler>) {
        self.write().entry(country).or_default().post_handlers.push(handler);
    }

    pub fn pre_validators(&self, country: CountryCode) -> Vec<Arc<dyn PreSubmitValidator>> {
        self.read()
            .get(&country)
            .map(|ext| ext.pre_validators.clone())
            .unwrap_or_default()
    }

    pub fn payload_mutators(&self, country: CountryCode) -> Vec<Arc<dyn PayloadMutator>> {
        self.read()
            .get(&country)
            .map(|ext| ext.payload_mutators.clone())
            .unwrap_or_default()
    }

    pub fn post_handlers(&self, country: CountryCode) -> Vec<Arc<dyn PostSubmitHandler>> {
        self.read()
            .get(&country)
            .map(|ext| ext.post_handlers.clone())
            .unwrap_or_default()
    }

    /// All three lists of `country`; empty when nothing is registered
    pub fn country_extensions(&self, country: CountryCode) -> SubmitExtensions {
        self.read().get(&country).cloned().unwrap_or_default()
    }

    pub fn has_extensions(&self, country: CountryCode) -> bool {
        self.read().get(&country).is_some_and(|ext| !ext.is_empty())
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Removes one country's lists; returns whether any were registered
    pub fn clear_country(&self, country: CountryCode) -> bool {
        self.write().remove(&country).is_some()
    }
}
