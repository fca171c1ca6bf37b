//! Country configuration factory
//!
//! Loads each country's bundle at most once, registers its contributions
//! into the shared registries and caches it. `clear_cache` empties the
//! cache and every registry.
//!
//! Loads are serialized, so concurrent loads of one country invoke its
//! loader once. Each load captures a generation number that `clear_cache`
//! bumps; a load that finishes after a clear is discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use core_kernel::CountryCode;

use crate::country_config::{CountryConfig, CountryLoader, ExtensionSlice};
use crate::dynamic_fields::DynamicFieldRegistry;
use crate::error::ClaimInfoError;
use crate::state::StateExtensionRegistry;
use crate::submit::SubmitExtensionRegistry;

pub struct CountryConfigFactory {
    cache: RwLock<HashMap<CountryCode, Arc<CountryConfig>>>,
    loaders: RwLock<HashMap<CountryCode, Arc<dyn CountryLoader>>>,
    dynamic_fields: Arc<DynamicFieldRegistry>,
    state_extensions: Arc<StateExtensionRegistry>,
    submit_extensions: Arc<SubmitExtensionRegistry>,
    generation: AtomicU64,
    load_lock: Mutex<()>,
}

impl Default for CountryConfigFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryConfigFactory {
    /// Creates a factory with fresh, empty registries
    pub fn new() -> Self {
        Self::with_registries(
            Arc::new(DynamicFieldRegistry::new()),
            Arc::new(StateExtensionRegistry::new()),
            Arc::new(SubmitExtensionRegistry::new()),
        )
    }

    /// Creates a factory writing into the given registries
    pub fn with_registries(
        dynamic_fields: Arc<DynamicFieldRegistry>,
        state_extensions: Arc<StateExtensionRegistry>,
        submit_extensions: Arc<SubmitExtensionRegistry>,
    ) -> Self {
        Self {
            cache: RwLock::default(),
            loaders: RwLock::default(),
            dynamic_fields,
            state_extensions,
            submit_extensions,
            generation: AtomicU64::new(0),
            load_lock: Mutex::new(()),
        }
    }

    pub fn dynamic_fields(&self) -> &Arc<DynamicFieldRegistry> {
        &self.dynamic_fields
    }

    pub fn state_extensions(&self) -> &Arc<StateExtensionRegistry> {
        &self.state_extensions
    }

    pub fn submit_extensions(&self) -> &Arc<SubmitExtensionRegistry> {
        &self.submit_extensions
    }

    /// Registers the loader for a country; the last registration wins
    pub fn register_country_extension<L>(&self, country: CountryCode, loader: L)
    where
        L: CountryLoader + 'static,
    {
        let previous = self
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(country, Arc::new(loader));
        if previous.is_some() {
            debug!(country = %country, "Replaced country loader");
        }
    }

    pub fn has_loader(&self, country: CountryCode) -> bool {
        self.loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&country)
    }

    fn cached(&self, country: CountryCode) -> Option<Arc<CountryConfig>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&country)
            .cloned()
    }

    pub fn is_cached(&self, country: CountryCode) -> bool {
        self.cached(country).is_some()
    }

    /// Returns the country's bundle, loading and registering it on first use
    #[instrument(skip(self), fields(country = %country))]
    pub async fn load_country_config(
        &self,
        country: CountryCode,
    ) -> Result<Arc<CountryConfig>, ClaimInfoError> {
        if let Some(config) = self.cached(country) {
            return Ok(config);
        }

        let _load = self.load_lock.lock().await;
        // Another caller may have finished loading while we waited.
        if let Some(config) = self.cached(country) {
            return Ok(config);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let loader = self
            .loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&country)
            .cloned()
            .ok_or_else(|| {
                ClaimInfoError::configuration_not_found(
                    country,
                    format!(
                        "No extension registered for country: {country}. \
                         Register one with register_country_extension"
                    ),
                )
            })?;

        let config = loader.load().await.map_err(|source| {
            warn!(error = %source, "Country loader failed");
            ClaimInfoError::ConfigurationNotFound { country, source }
        })?;

        config.validate(country).map_err(|source| {
            warn!(error = %source, "Country bundle rejected");
            ClaimInfoError::ConfigurationNotFound { country, source }
        })?;

        let config = Arc::new(config);
        {
            // Holding the cache lock orders this commit against clear_cache.
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            if self.generation.load(Ordering::SeqCst) != generation {
                warn!("Cache cleared during load, discarding bundle");
                return Err(ClaimInfoError::LoadSuperseded(country));
            }
            self.register_contributions(&config);
            cache.insert(country, Arc::clone(&config));
        }

        info!(
            country_name = %config.country_name,
            dynamic_fields = config.dynamic_fields.len(),
            "Country configuration loaded"
        );
        Ok(config)
    }

    fn register_contributions(&self, config: &CountryConfig) {
        if !config.dynamic_fields.is_empty() {
            self.dynamic_fields.register_many(config.dynamic_fields.iter().cloned());
        }

        if let Some(extension) = config.state_extension.as_ref().filter(|ext| ext.actions.is_some()) {
            self.state_extensions
                .register(config.country_code, Arc::new(ExtensionSlice::new(extension.clone())));
        }

        if let Some(submit) = &config.submit_extensions {
            self.submit_extensions
                .register_country_extensions(config.country_code, submit.clone());
        }
    }

    /// Empties the cache and all three registries
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        cache.clear();
        self.dynamic_fields.clear();
        self.state_extensions.clear();
        self.submit_extensions.clear();
        debug!("Country configuration cache cleared");
    }

    pub fn is_country_supported(&self, code: &str) -> bool {
        CountryCode::is_supported(code)
    }

    pub fn supported_countries(&self) -> Vec<CountryCode> {
        CountryCode::ALL.to_vec()
    }
}
