//! Costa Rica extension bundle
//!
//! Relabels the identity and plate fields, requires the delinquency field,
//! tracks SUGEF reporting in the store and hooks RUC, amount and vehicle
//! handling into submission. Costa Rica contributes no dynamic fields.

pub mod formats;
pub mod handlers;
pub mod mutators;
pub mod overrides;
pub mod state;
pub mod validations;
pub mod validators;

use std::sync::Arc;
use std::time::Duration;

use core_kernel::CountryCode;
use domain_claim_info::{
    CountryConfig, CountryConfigFactory, ExtensionError, SubmissionJournal, SubmitExtensions,
};

pub const COUNTRY: CountryCode = CountryCode::CostaRica;

/// Runtime settings of the bundle
#[derive(Debug, Clone)]
pub struct Options {
    /// Where post-submit handlers record submissions
    pub journal: Arc<SubmissionJournal>,
    /// Whether handlers wait like the remote services they stand in for
    pub simulate_delays: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            journal: Arc::new(SubmissionJournal::new()),
            simulate_delays: true,
        }
    }
}

impl Options {
    /// No simulated latency; for tests
    pub fn immediate(journal: Arc<SubmissionJournal>) -> Self {
        Self {
            journal,
            simulate_delays: false,
        }
    }

    pub(crate) fn delay(&self, millis: u64) -> Duration {
        if self.simulate_delays {
            Duration::from_millis(millis)
        } else {
            Duration::ZERO
        }
    }
}

/// Builds the Costa Rica bundle
pub fn config(options: &Options) -> CountryConfig {
    CountryConfig {
        country_code: COUNTRY,
        country_name: COUNTRY.name().to_string(),
        field_overrides: Some(overrides::field_overrides()),
        dynamic_fields: Vec::new(),
        state_extension: Some(state::state_extension()),
        global_validations: Some(validations::country_validations()),
        submit_extensions: Some(submit_extensions(options)),
    }
}

pub fn submit_extensions(options: &Options) -> SubmitExtensions {
    SubmitExtensions::new()
        .with_pre_validator(validators::ruc_format())
        .with_pre_validator(validators::required_fields())
        .with_pre_validator(validators::amounts())
        .with_payload_mutator(mutators::country_metadata())
        .with_payload_mutator(mutators::normalize_ruc())
        .with_payload_mutator(mutators::normalize_amounts())
        .with_payload_mutator(mutators::enrich_vehicle())
        .with_post_handler(handlers::submission_log(options))
        .with_post_handler(handlers::confirmation_notification(options))
        .with_post_handler(handlers::claim_document(options))
}

/// Registers the Costa Rica loader with `factory`
pub fn register(factory: &CountryConfigFactory, options: Options) {
    factory.register_country_extension(COUNTRY, move || {
        let bundle = config(&options);
        async move { Ok::<_, ExtensionError>(bundle) }
    });
}
