//! Error returned by carrier gateway and token provider calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ErrorCode, ShippingError};

/// Failure of a single remote carrier call.
///
/// Keeps the HTTP status and the upstream body so handlers can log what the
/// carrier actually answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierError {
    /// Error category.
    pub code: ErrorCode,

    /// Gateway operation that failed (e.g. `create_quotation`).
    pub operation: String,

    /// Human-readable message.
    pub message: String,

    /// HTTP status, when the carrier answered at all.
    pub status: Option<u16>,

    /// Upstream error body, when one was returned.
    pub upstream: Option<Value>,
}

impl CarrierError {
    pub fn new(code: ErrorCode, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            operation: operation.into(),
            message: message.into(),
            status: None,
            upstream: None,
        }
    }

    /// Missing or malformed credentials, detected before any request.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationInvalid, "authenticate", message)
    }

    /// Token request rejected or answered without a token.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationFailure, "authenticate", message)
    }

    /// Transport failure or non-2xx answer.
    pub fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamRequestFailure, operation, message)
    }

    /// 2xx answer whose body lacks the fields the operation needs.
    pub fn response_shape(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResponseShapeInvalid, operation, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_upstream(mut self, body: Value) -> Self {
        self.upstream = Some(body);
        self
    }
}

impl std::fmt::Display for CarrierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}: {}", self.code, self.operation, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for CarrierError {}

impl From<CarrierError> for ShippingError {
    fn from(err: CarrierError) -> Self {
        match err.code {
            ErrorCode::ConfigurationInvalid => ShippingError::ConfigurationInvalid(err.message),
            ErrorCode::AuthenticationFailure => ShippingError::AuthenticationFailure(err.message),
            ErrorCode::ResponseShapeInvalid => ShippingError::ResponseShapeInvalid {
                operation: err.operation,
                message: err.message,
            },
            _ => ShippingError::upstream(err.operation, err.message, err.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_operation_and_status() {
        let err = CarrierError::upstream("create_shipment", "Bad Gateway").with_status(502);
        assert_eq!(
            err.to_string(),
            "UPSTREAM_REQUEST_FAILURE in create_shipment: Bad Gateway (HTTP 502)"
        );
    }

    #[test]
    fn authentication_maps_to_authentication_failure() {
        let err: ShippingError = CarrierError::authentication("no access_token").into();
        assert_eq!(err.code(), ErrorCode::AuthenticationFailure);
    }

    #[test]
    fn upstream_keeps_status() {
        let err: ShippingError = CarrierError::upstream("get_pickup", "Not Found")
            .with_status(404)
            .with_upstream(json!({ "errors": ["not found"] }))
            .into();

        assert_eq!(
            err,
            ShippingError::UpstreamRequestFailure {
                operation: "get_pickup".to_string(),
                message: "Not Found".to_string(),
                status: Some(404),
            }
        );
    }

    #[test]
    fn response_shape_is_preserved() {
        let err: ShippingError =
            CarrierError::response_shape("create_quotation", "missing id").into();
        assert_eq!(err.code(), ErrorCode::ResponseShapeInvalid);
    }
}
