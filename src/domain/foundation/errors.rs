//! Error types for the shipping domain.
//!
//! Every failure that crosses a component boundary is a [`ShippingError`].
//! Callers that need the flat `{success, error, message}` shape (route layers,
//! workflow steps) convert with [`ShippingError::to_envelope`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration / credentials
    ConfigurationInvalid,
    AuthenticationFailure,

    // Remote calls
    UpstreamRequestFailure,
    ResponseShapeInvalid,
    PollTimeoutExceeded,

    // Business rules
    NoApplicableRate,
    NoMatchingWarehouseItems,
    InvalidDestinationAddress,
    InvalidRequest,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ConfigurationInvalid => "CONFIGURATION_INVALID",
            ErrorCode::AuthenticationFailure => "AUTHENTICATION_FAILURE",
            ErrorCode::UpstreamRequestFailure => "UPSTREAM_REQUEST_FAILURE",
            ErrorCode::ResponseShapeInvalid => "RESPONSE_SHAPE_INVALID",
            ErrorCode::PollTimeoutExceeded => "POLL_TIMEOUT_EXCEEDED",
            ErrorCode::NoApplicableRate => "NO_APPLICABLE_RATE",
            ErrorCode::NoMatchingWarehouseItems => "NO_MATCHING_WAREHOUSE_ITEMS",
            ErrorCode::InvalidDestinationAddress => "INVALID_DESTINATION_ADDRESS",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
        };
        write!(f, "{}", s)
    }
}

/// Failures surfaced by the quotation, shipment and pickup flows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShippingError {
    #[error("Carrier configuration is invalid: {0}")]
    ConfigurationInvalid(String),

    #[error("Carrier authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Carrier request failed during {operation}: {message}")]
    UpstreamRequestFailure {
        operation: String,
        message: String,
        status: Option<u16>,
    },

    #[error("Carrier response for {operation} has an unexpected shape: {message}")]
    ResponseShapeInvalid { operation: String, message: String },

    #[error("{resource} {id} did not reach a terminal state after {attempts} attempts")]
    PollTimeoutExceeded {
        resource: String,
        id: String,
        attempts: u32,
    },

    #[error("No selected rate for warehouse {warehouse_id}")]
    NoApplicableRate { warehouse_id: String },

    #[error("No fulfilled items belong to warehouse {warehouse_id}")]
    NoMatchingWarehouseItems { warehouse_id: String },

    #[error("Shipping address is missing")]
    InvalidDestinationAddress,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidRequest { field: String, reason: String },
}

impl ShippingError {
    pub fn upstream(
        operation: impl Into<String>,
        message: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        ShippingError::UpstreamRequestFailure {
            operation: operation.into(),
            message: message.into(),
            status,
        }
    }

    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ShippingError::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn no_applicable_rate(warehouse_id: impl Into<String>) -> Self {
        ShippingError::NoApplicableRate {
            warehouse_id: warehouse_id.into(),
        }
    }

    pub fn no_matching_warehouse_items(warehouse_id: impl Into<String>) -> Self {
        ShippingError::NoMatchingWarehouseItems {
            warehouse_id: warehouse_id.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ShippingError::ConfigurationInvalid(_) => ErrorCode::ConfigurationInvalid,
            ShippingError::AuthenticationFailure(_) => ErrorCode::AuthenticationFailure,
            ShippingError::UpstreamRequestFailure { .. } => ErrorCode::UpstreamRequestFailure,
            ShippingError::ResponseShapeInvalid { .. } => ErrorCode::ResponseShapeInvalid,
            ShippingError::PollTimeoutExceeded { .. } => ErrorCode::PollTimeoutExceeded,
            ShippingError::NoApplicableRate { .. } => ErrorCode::NoApplicableRate,
            ShippingError::NoMatchingWarehouseItems { .. } => ErrorCode::NoMatchingWarehouseItems,
            ShippingError::InvalidDestinationAddress => ErrorCode::InvalidDestinationAddress,
            ShippingError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
        }
    }

    /// True for failures detected locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ShippingError::ConfigurationInvalid(_)
                | ShippingError::NoApplicableRate { .. }
                | ShippingError::NoMatchingWarehouseItems { .. }
                | ShippingError::InvalidDestinationAddress
                | ShippingError::InvalidRequest { .. }
        )
    }

    /// Converts the error into the uniform failure envelope.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Uniform failure envelope returned to callers that cannot consume `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(ErrorCode::NoApplicableRate.to_string(), "NO_APPLICABLE_RATE");
        assert_eq!(
            ErrorCode::UpstreamRequestFailure.to_string(),
            "UPSTREAM_REQUEST_FAILURE"
        );
    }

    #[test]
    fn error_code_serializes_like_display() {
        let json = serde_json::to_string(&ErrorCode::NoMatchingWarehouseItems).unwrap();
        assert_eq!(json, "\"NO_MATCHING_WAREHOUSE_ITEMS\"");
    }

    #[test]
    fn envelope_carries_code_and_message() {
        let err = ShippingError::no_matching_warehouse_items("WH9");
        let envelope = err.to_envelope();

        assert!(!envelope.success);
        assert_eq!(envelope.error, "NO_MATCHING_WAREHOUSE_ITEMS");
        assert!(envelope.message.contains("WH9"));
    }

    #[test]
    fn local_errors_are_flagged() {
        assert!(ShippingError::InvalidDestinationAddress.is_local());
        assert!(ShippingError::no_applicable_rate("WH1").is_local());
        assert!(!ShippingError::upstream("create_shipment", "boom", Some(502)).is_local());
    }

    #[test]
    fn upstream_error_mentions_operation() {
        let err = ShippingError::upstream("get_quotation", "timeout", None);
        assert_eq!(err.code(), ErrorCode::UpstreamRequestFailure);
        assert!(err.to_string().contains("get_quotation"));
    }
}
