//! CarrierAdminHandler - Administrative carrier operations.
//!
//! Connection checks, shipment administration and the order, product and
//! printing-format passthroughs. None of these aggregate or poll; they
//! validate input locally and forward the carrier's answer as-is.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ErrorEnvelope, ShippingError};
use crate::domain::shipping::PrintingFormat;
use crate::ports::{CarrierGateway, TokenProvider};

/// Outcome of a connection check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
}

/// Handler for administrative carrier operations.
pub struct CarrierAdminHandler {
    gateway: Arc<dyn CarrierGateway>,
    tokens: Arc<dyn TokenProvider>,
}

impl CarrierAdminHandler {
    pub fn new(gateway: Arc<dyn CarrierGateway>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { gateway, tokens }
    }

    /// Authenticates once and reports whether a token was obtained.
    pub async fn check_connection(&self) -> ConnectionStatus {
        match self.tokens.access_token().await {
            Ok(_) => {
                tracing::info!("Carrier connection verified");
                ConnectionStatus {
                    connected: true,
                    error: None,
                }
            }
            Err(e) => {
                let err = ShippingError::from(e);
                tracing::warn!(code = %err.code(), "Carrier connection check failed: {}", err);
                ConnectionStatus {
                    connected: false,
                    error: Some(err.to_envelope()),
                }
            }
        }
    }

    // Shipments

    pub async fn list_shipments(&self, page: u32) -> Result<Value, ShippingError> {
        check_page(page)?;
        Ok(self.gateway.list_shipments(page).await?)
    }

    pub async fn track_shipment(
        &self,
        tracking_number: &str,
        carrier_name: &str,
    ) -> Result<Value, ShippingError> {
        require("tracking_number", tracking_number)?;
        require("carrier_name", carrier_name)?;
        Ok(self
            .gateway
            .track_shipment(tracking_number.trim(), &carrier_name.trim().to_lowercase())
            .await?)
    }

    pub async fn cancel_shipment(
        &self,
        shipment_id: &str,
        reason: &str,
    ) -> Result<Value, ShippingError> {
        require("shipment_id", shipment_id)?;
        require("reason", reason)?;
        let result = self.gateway.cancel_shipment(shipment_id, reason.trim()).await?;
        tracing::info!(shipment_id, "Shipment cancellation requested");
        Ok(result)
    }

    /// Insures an existing shipment for `declared_value`.
    pub async fn protect_shipment(
        &self,
        shipment_id: &str,
        declared_value: f64,
    ) -> Result<Value, ShippingError> {
        require("shipment_id", shipment_id)?;
        if !(declared_value.is_finite() && declared_value > 0.0) {
            return Err(ShippingError::invalid_request(
                "declared_value",
                "must be greater than zero",
            ));
        }
        let result = self
            .gateway
            .protect_shipment(shipment_id, declared_value)
            .await?;
        tracing::info!(shipment_id, declared_value, "Shipment protection requested");
        Ok(result)
    }

    // Orders

    pub async fn list_orders(&self, page: u32) -> Result<Value, ShippingError> {
        check_page(page)?;
        Ok(self.gateway.list_orders(page).await?)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Value, ShippingError> {
        require("order_id", order_id)?;
        Ok(self.gateway.get_order(order_id).await?)
    }

    pub async fn create_order(&self, order: &Value) -> Result<Value, ShippingError> {
        require_object("order", order)?;
        Ok(self.gateway.create_order(order).await?)
    }

    pub async fn update_order(
        &self,
        order_id: &str,
        changes: &Value,
    ) -> Result<Value, ShippingError> {
        require("order_id", order_id)?;
        require_object("changes", changes)?;
        Ok(self.gateway.update_order(order_id, changes).await?)
    }

    // Products and settings

    pub async fn list_products(&self, page: u32) -> Result<Value, ShippingError> {
        check_page(page)?;
        Ok(self.gateway.list_products(page).await?)
    }

    /// Accepts `standard` or `thermal`, case-insensitively.
    pub async fn update_printing_format(&self, format: &str) -> Result<Value, ShippingError> {
        let format = PrintingFormat::parse(format).ok_or_else(|| {
            ShippingError::invalid_request("printing_format", "expected 'standard' or 'thermal'")
        })?;
        Ok(self.gateway.update_printing_format(format).await?)
    }
}

fn check_page(page: u32) -> Result<(), ShippingError> {
    if page == 0 {
        return Err(ShippingError::invalid_request("page", "pages start at 1"));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), ShippingError> {
    if value.trim().is_empty() {
        return Err(ShippingError::invalid_request(field, "must not be empty"));
    }
    Ok(())
}

fn require_object(field: &str, value: &Value) -> Result<(), ShippingError> {
    if !value.is_object() {
        return Err(ShippingError::invalid_request(field, "must be a JSON object"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::skydropx::MockCarrierGateway;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::CarrierError;
    use serde_json::json;

    fn handler(mock: &MockCarrierGateway) -> CarrierAdminHandler {
        CarrierAdminHandler::new(Arc::new(mock.clone()), Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn connection_check_reports_success() {
        let mock = MockCarrierGateway::new();
        let status = handler(&mock).check_connection().await;
        assert_eq!(
            status,
            ConnectionStatus {
                connected: true,
                error: None
            }
        );
    }

    #[tokio::test]
    async fn connection_check_reports_failure_envelope() {
        let mock = MockCarrierGateway::new();
        mock.set_method_error(
            "access_token",
            CarrierError::configuration("API key is not configured"),
        );

        let status = handler(&mock).check_connection().await;

        assert!(!status.connected);
        let envelope = status.error.unwrap();
        assert_eq!(envelope.error, "CONFIGURATION_INVALID");
        assert!(!envelope.success);
    }

    #[tokio::test]
    async fn tracking_normalizes_carrier_name() {
        let mock = MockCarrierGateway::new();
        handler(&mock).track_shipment(" 7946 ", "FedEx").await.unwrap();
        assert_eq!(mock.calls()[0].args, vec!["7946", "fedex"]);
    }

    #[tokio::test]
    async fn tracking_requires_both_fields() {
        let mock = MockCarrierGateway::new();
        let err = handler(&mock).track_shipment("7946", "").await.unwrap_err();
        assert_eq!(err, ShippingError::invalid_request("carrier_name", "must not be empty"));
        assert_eq!(mock.remote_call_count(), 0);
    }

    #[tokio::test]
    async fn cancellation_requires_reason() {
        let mock = MockCarrierGateway::new();
        let handler = handler(&mock);

        assert!(handler.cancel_shipment("shp_1", "  ").await.is_err());
        handler.cancel_shipment("shp_1", "Cliente canceló").await.unwrap();
        assert_eq!(mock.call_count("cancel_shipment"), 1);
    }

    #[tokio::test]
    async fn protection_requires_positive_value() {
        let mock = MockCarrierGateway::new();
        let handler = handler(&mock);

        let err = handler.protect_shipment("shp_1", 0.0).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(handler.protect_shipment("shp_1", f64::NAN).await.is_err());
        assert!(handler.protect_shipment("shp_1", 1500.0).await.is_ok());
    }

    #[tokio::test]
    async fn printing_format_is_validated() {
        let mock = MockCarrierGateway::new();
        let handler = handler(&mock);

        assert!(handler.update_printing_format("a4").await.is_err());
        handler.update_printing_format("Standard").await.unwrap();
        assert_eq!(mock.calls()[0].args, vec!["Standard"]);
    }

    #[tokio::test]
    async fn orders_pass_through_carrier_answer() {
        let mock = MockCarrierGateway::new();
        mock.set_response("get_order", json!({ "data": { "id": "ord_1" } }));
        let handler = handler(&mock);

        let order = handler.get_order("ord_1").await.unwrap();
        assert_eq!(order["data"]["id"], "ord_1");
        assert!(handler.create_order(&json!([1, 2])).await.is_err());
        assert!(handler.update_order("ord_1", &json!({ "status": "ready" })).await.is_ok());
    }

    #[tokio::test]
    async fn upstream_errors_keep_their_code() {
        let mock = MockCarrierGateway::new();
        mock.set_method_error(
            "list_products",
            CarrierError::upstream("list_products", "Unauthorized").with_status(401),
        );

        let err = handler(&mock).list_products(1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UpstreamRequestFailure);
        assert!(handler(&mock).list_products(0).await.is_err());
    }
}
