//! Carrier API configuration (Skydropx Pro)

use serde::Deserialize;

use super::error::ValidationError;
use super::runtime::Environment;

/// Carrier API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierConfig {
    /// Base URL of the carrier API, e.g. `https://pro.skydropx.com/api/v1`
    #[serde(default)]
    pub api_url: String,

    /// OAuth client id
    #[serde(default)]
    pub api_key: String,

    /// OAuth client secret
    #[serde(default)]
    pub api_secret: String,

    /// OAuth scope requested with the client-credentials grant
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Carriers to quote against (comma-separated)
    #[serde(default = "default_requested_carriers")]
    pub requested_carriers: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Label printing format sent with shipments (`standard` or `thermal`)
    #[serde(default = "default_printing_format")]
    pub printing_format: String,
}

impl CarrierConfig {
    /// Requested carriers as a vector
    pub fn requested_carriers_list(&self) -> Vec<String> {
        self.requested_carriers
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate carrier configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.api_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CARRIER__API_URL"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidApiUrl);
        }
        if *environment == Environment::Production && !self.api_url.starts_with("https://") {
            return Err(ValidationError::ApiUrlMustBeHttps);
        }
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CARRIER__API_KEY"));
        }
        if self.api_secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CARRIER__API_SECRET"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.requested_carriers_list().is_empty() {
            return Err(ValidationError::NoCarriersRequested);
        }
        if !matches!(self.printing_format.as_str(), "standard" | "thermal") {
            return Err(ValidationError::InvalidPrintingFormat(
                self.printing_format.clone(),
            ));
        }
        Ok(())
    }
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            scope: default_scope(),
            requested_carriers: default_requested_carriers(),
            request_timeout_secs: default_request_timeout(),
            printing_format: default_printing_format(),
        }
    }
}

fn default_scope() -> String {
    "default orders.create".to_string()
}

fn default_requested_carriers() -> String {
    "fedex,dhl".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_printing_format() -> String {
    "thermal".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> CarrierConfig {
        CarrierConfig {
            api_url: "https://pro.skydropx.com/api/v1".to_string(),
            api_key: "client-id".to_string(),
            api_secret: "client-secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = CarrierConfig::default();
        assert_eq!(config.scope, "default orders.create");
        assert_eq!(config.requested_carriers_list(), vec!["fedex", "dhl"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.printing_format, "thermal");
    }

    #[test]
    fn test_requested_carriers_are_normalized() {
        let config = CarrierConfig {
            requested_carriers: " FedEx, ,dhl ,estafeta".to_string(),
            ..valid_config()
        };
        assert_eq!(
            config.requested_carriers_list(),
            vec!["fedex", "dhl", "estafeta"]
        );
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_validation_missing_api_url() {
        let config = CarrierConfig {
            api_url: String::new(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("CARRIER__API_URL"))
        );
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = CarrierConfig {
            api_secret: "  ".to_string(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("CARRIER__API_SECRET"))
        );
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = CarrierConfig {
            api_url: "ftp://example.com".to_string(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidApiUrl)
        );
    }

    #[test]
    fn test_validation_requires_https_in_production() {
        let config = CarrierConfig {
            api_url: "http://localhost:4010".to_string(),
            ..valid_config()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::ApiUrlMustBeHttps)
        );
    }

    #[test]
    fn test_validation_rejects_unknown_printing_format() {
        let config = CarrierConfig {
            printing_format: "a4".to_string(),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPrintingFormat(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_carrier_list() {
        let config = CarrierConfig {
            requested_carriers: " , ".to_string(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::NoCarriersRequested)
        );
    }
}
