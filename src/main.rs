//! Skydropx Pro connection check.
//!
//! Loads configuration from the environment, initialises logging and verifies
//! that the configured credentials obtain a token from the carrier.

use std::process::ExitCode;
use std::sync::Arc;

use skydropx_pro::adapters::skydropx::{CredentialAuthenticator, SkydropxClient, SkydropxSettings};
use skydropx_pro::application::ShippingServices;
use skydropx_pro::config::{AppConfig, LogFormat, RuntimeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.runtime);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let settings = SkydropxSettings::from_config(&config.carrier);
    let authenticator = match CredentialAuthenticator::new(settings.clone()) {
        Ok(authenticator) => Arc::new(authenticator),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build authenticator");
            return ExitCode::FAILURE;
        }
    };
    let client = match SkydropxClient::new(settings, authenticator.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build carrier client");
            return ExitCode::FAILURE;
        }
    };

    let services = ShippingServices::new(&config, client, authenticator);

    tracing::info!(
        api_url = %config.carrier.api_url,
        carriers = ?config.carrier.requested_carriers_list(),
        "Checking carrier connection"
    );
    let status = services.admin.check_connection().await;

    if status.connected {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(runtime: &RuntimeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&runtime.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match runtime.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
