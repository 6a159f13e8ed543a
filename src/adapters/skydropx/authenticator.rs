//! OAuth client-credentials authentication.
//!
//! Every call to [`CredentialAuthenticator::authenticate`] requests a fresh
//! token; nothing is cached.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::settings::SkydropxSettings;
use crate::ports::{AccessToken, CarrierError, TokenProvider};

const TOKEN_PATH: &str = "/oauth/token";
const GRANT_TYPE: &str = "client_credentials";

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'a str,
}

/// Exchanges the configured client credentials for a bearer token.
pub struct CredentialAuthenticator {
    settings: SkydropxSettings,
    http: reqwest::Client,
}

impl CredentialAuthenticator {
    pub fn new(settings: SkydropxSettings) -> Result<Self, CarrierError> {
        let http = settings.http_client().map_err(|e| {
            CarrierError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { settings, http })
    }

    pub async fn authenticate(&self) -> Result<AccessToken, CarrierError> {
        self.check_credentials()?;

        let request = TokenRequest {
            grant_type: GRANT_TYPE,
            client_id: self.settings.client_id().trim(),
            client_secret: self.settings.client_secret().trim(),
            scope: &self.settings.scope,
        };

        let response = self
            .http
            .post(self.settings.url(TOKEN_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(operation = "authenticate", error = %e, "Token request failed");
                CarrierError::authentication(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            tracing::error!(
                operation = "authenticate",
                status = status.as_u16(),
                upstream = %body,
                "Carrier rejected credentials"
            );
            return Err(
                CarrierError::authentication(format!("Token endpoint answered {}", status))
                    .with_status(status.as_u16())
                    .with_upstream(body),
            );
        }

        extract_token(&body).map_err(|e| {
            tracing::error!(
                operation = "authenticate",
                upstream = %body,
                "Token response has no access_token"
            );
            e
        })
    }

    fn check_credentials(&self) -> Result<(), CarrierError> {
        let missing = if self.settings.api_url.trim().is_empty() {
            "API URL"
        } else if self.settings.client_id().trim().is_empty() {
            "API key"
        } else if self.settings.client_secret().trim().is_empty() {
            "API secret"
        } else {
            return Ok(());
        };

        tracing::error!(operation = "authenticate", missing, "Carrier credentials are incomplete");
        Err(CarrierError::configuration(format!("{} is not configured", missing)))
    }
}

#[async_trait]
impl TokenProvider for CredentialAuthenticator {
    async fn access_token(&self) -> Result<AccessToken, CarrierError> {
        self.authenticate().await
    }
}

/// Reads a non-empty string `access_token` from a token response.
pub fn extract_token(body: &Value) -> Result<AccessToken, CarrierError> {
    body.get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.trim().is_empty())
        .map(AccessToken::new)
        .ok_or_else(|| {
            CarrierError::authentication("Token response has no access_token")
                .with_upstream(body.clone())
        })
}
