//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Open-banking provider configuration.
    pub provider: ProviderConfig,
    /// Sync pipeline configuration.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Open-banking provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider's REST API.
    pub base_url: String,
    /// OAuth client ID issued by the provider.
    pub client_id: String,
    /// OAuth client secret issued by the provider.
    pub client_secret: String,
    /// Timeout applied to each HTTP call to the provider, in seconds.
    ///
    /// Timeouts are per call, not per sync: a single slow account must not
    /// starve accounts that have already completed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of transactions requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

/// Sync pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Maximum number of accounts synced concurrently.
    ///
    /// Bounded so that a customer with many linked accounts does not open
    /// unbounded outbound connections to the provider.
    #[serde(default = "default_max_concurrent_accounts")]
    pub max_concurrent_accounts: usize,
}

fn default_max_concurrent_accounts() -> usize {
    4
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_accounts: default_max_concurrent_accounts(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BANKFEED").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
