//! Country registration
//!
//! Every country bundle the server knows is registered here, sharing one
//! submission journal.

use domain_claim_info::{CountryConfigFactory, SubmissionJournal};
use std::sync::Arc;
use tracing::info;

/// Registers the Costa Rica and Panama loaders with `factory`
pub fn register_countries(
    factory: &CountryConfigFactory,
    journal: &Arc<SubmissionJournal>,
    simulate_delays: bool,
) {
    country_costa_rica::register(
        factory,
        country_costa_rica::Options {
            journal: Arc::clone(journal),
            simulate_delays,
        },
    );
    country_panama::register(
        factory,
        country_panama::Options {
            journal: Arc::clone(journal),
            simulate_delays,
        },
    );
    info!(countries = ?factory.supported_countries(), "Country extensions registered");
}

/// A factory with every country registered
pub fn country_factory(journal: &Arc<SubmissionJournal>, simulate_delays: bool) -> Arc<CountryConfigFactory> {
    let factory = Arc::new(CountryConfigFactory::new());
    register_countries(&factory, journal, simulate_delays);
    factory
}
