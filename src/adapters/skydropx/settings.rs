//! Connection settings shared by the authenticator and the API client.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::config::CarrierConfig;

const DEFAULT_SCOPE: &str = "default orders.create";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Skydropx Pro API settings.
#[derive(Debug, Clone)]
pub struct SkydropxSettings {
    /// Base URL, e.g. `https://pro.skydropx.com/api/v1`.
    pub api_url: String,
    client_id: String,
    client_secret: SecretString,
    /// OAuth scope requested with the client-credentials grant.
    pub scope: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SkydropxSettings {
    pub fn new(
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            scope: DEFAULT_SCOPE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &CarrierConfig) -> Self {
        Self::new(&config.api_url, &config.api_key, &config.api_secret)
            .with_scope(&config.scope)
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Joins a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds the HTTP client used for every call.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout).build()
    }
}
