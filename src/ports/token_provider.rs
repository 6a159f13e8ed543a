//! Bearer token port.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::CarrierError;

/// Source of bearer tokens for the carrier API.
///
/// Implementations may hit the network on every call; callers must not assume
/// tokens are cached.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken, CarrierError>;
}

/// Opaque bearer token. Redacted in `Debug` output.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    /// Header value for `Authorization`.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
