//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SKYDROPX_PRO` prefix and nested values use double underscores as separators.
//!
//! Configuration is read once at process start and handed to the adapters and
//! handlers explicitly; business logic never reads the environment itself.
//!
//! # Example
//!
//! ```no_run
//! use skydropx_pro::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Quoting against {:?}", config.carrier.requested_carriers_list());
//! ```

mod carrier;
mod error;
mod polling;
mod runtime;
mod store;

pub use carrier::CarrierConfig;
pub use error::{ConfigError, ValidationError};
pub use polling::{PollPolicyConfig, PollingConfig};
pub use runtime::{Environment, LogFormat, RuntimeConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Runtime configuration (environment, logging)
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Carrier API configuration (credentials, carriers)
    #[serde(default)]
    pub carrier: CarrierConfig,

    /// Store origin address
    #[serde(default)]
    pub store: StoreConfig,

    /// Polling budgets
    #[serde(default)]
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SKYDROPX_PRO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SKYDROPX_PRO__CARRIER__API_KEY=...` -> `carrier.api_key = ...`
    /// - `SKYDROPX_PRO__STORE__ZIP_CODE=54030` -> `store.zip_code = "54030"`
    /// - `SKYDROPX_PRO__POLLING__SHIPMENT__MAX_ATTEMPTS=8`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SKYDROPX_PRO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.runtime.validate()?;
        self.carrier.validate(&self.runtime.environment)?;
        self.store.validate()?;
        self.polling.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.runtime.is_production()
    }
}
