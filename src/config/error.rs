//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Carrier API URL must start with http:// or https://")]
    InvalidApiUrl,

    #[error("Carrier API URL must use HTTPS in production")]
    ApiUrlMustBeHttps,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("At least one carrier must be requested")]
    NoCarriersRequested,

    #[error("Invalid printing format: {0}")]
    InvalidPrintingFormat(String),

    #[error("Polling policy '{0}' must allow between 1 and 16 attempts")]
    InvalidPollAttempts(&'static str),

    #[error("Polling policy '{0}' must have a non-zero initial delay")]
    InvalidPollDelay(&'static str),

    #[error("Store zip code must contain digits")]
    InvalidStoreZipCode,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
