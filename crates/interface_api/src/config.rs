//! API configuration

use core_kernel::CountryCode;
use domain_claim_info::journal::DEFAULT_LOG_CAPACITY;
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Country loaded at startup, if any
    #[serde(default)]
    pub default_country: Option<String>,
    /// Latency of the mock claim backend in milliseconds
    pub mock_submit_latency_ms: u64,
    /// Whether country post-submit handlers wait like remote services
    pub simulate_handler_delays: bool,
    /// Entries kept per submission journal log
    pub journal_log_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            default_country: None,
            mock_submit_latency_ms: 1500,
            simulate_handler_delays: true,
            journal_log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = ApiConfig::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("mock_submit_latency_ms", defaults.mock_submit_latency_ms as i64)?
            .set_default("simulate_handler_delays", defaults.simulate_handler_delays)?
            .set_default("journal_log_capacity", defaults.journal_log_capacity as i64)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured startup country
    ///
    /// Unknown codes are reported as an error so a typo does not silently
    /// start the server without a country.
    pub fn default_country(&self) -> Result<Option<CountryCode>, core_kernel::CoreError> {
        self.default_country
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(str::parse)
            .transpose()
    }
}
