//! Polling budgets for asynchronous carrier resources

use serde::Deserialize;

use super::error::ValidationError;

/// Largest attempt budget accepted; 2^16 seconds of backoff is already far
/// beyond any useful wait.
const MAX_ATTEMPTS: u32 = 16;

/// Attempt budget and initial backoff for one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollPolicyConfig {
    /// Maximum number of re-fetches
    pub max_attempts: u32,

    /// Delay before the first re-fetch, in milliseconds (doubles each attempt)
    pub initial_delay_ms: u64,
}

impl PollPolicyConfig {
    fn validate(&self, name: &'static str) -> Result<(), ValidationError> {
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS {
            return Err(ValidationError::InvalidPollAttempts(name));
        }
        if self.initial_delay_ms == 0 {
            return Err(ValidationError::InvalidPollDelay(name));
        }
        Ok(())
    }
}

/// Polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Quotation completion polling
    #[serde(default = "default_quotation")]
    pub quotation: PollPolicyConfig,

    /// Shipment workflow polling
    #[serde(default = "default_shipment")]
    pub shipment: PollPolicyConfig,

    /// Pickup scheduling polling
    #[serde(default = "default_pickup")]
    pub pickup: PollPolicyConfig,
}

impl PollingConfig {
    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.quotation.validate("quotation")?;
        self.shipment.validate("shipment")?;
        self.pickup.validate("pickup")?;
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            quotation: default_quotation(),
            shipment: default_shipment(),
            pickup: default_pickup(),
        }
    }
}

fn default_quotation() -> PollPolicyConfig {
    PollPolicyConfig {
        max_attempts: 5,
        initial_delay_ms: 1000,
    }
}

fn default_shipment() -> PollPolicyConfig {
    PollPolicyConfig {
        max_attempts: 10,
        initial_delay_ms: 1000,
    }
}

fn default_pickup() -> PollPolicyConfig {
    PollPolicyConfig {
        max_attempts: 10,
        initial_delay_ms: 1000,
    }
}
