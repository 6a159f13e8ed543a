//! Skydropx Pro API client.
//!
//! Implements the `CarrierGateway` port over HTTPS. Each call fetches a fresh
//! bearer token from the injected `TokenProvider`, sends one request and maps
//! any failure to a `CarrierError` carrying the upstream body.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::{json, Value};

use super::settings::SkydropxSettings;
use super::wire;
use crate::domain::shipping::{
    PickupRequest, PickupResource, PrintingFormat, Quotation, QuotationRequest, ShipmentRequest,
    ShipmentResource,
};
use crate::ports::{CarrierError, CarrierGateway, TokenProvider};

/// HTTP implementation of the carrier gateway.
pub struct SkydropxClient {
    settings: SkydropxSettings,
    tokens: Arc<dyn TokenProvider>,
    http: reqwest::Client,
}

impl SkydropxClient {
    pub fn new(
        settings: SkydropxSettings,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, CarrierError> {
        let http = settings.http_client().map_err(|e| {
            CarrierError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self {
            settings,
            tokens,
            http,
        })
    }

    async fn get(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, CarrierError> {
        self.send(operation, Method::GET, path, query, None).await
    }

    async fn post(
        &self,
        operation: &'static str,
        path: &str,
        body: &Value,
    ) -> Result<Value, CarrierError> {
        self.send(operation, Method::POST, path, &[], Some(body))
            .await
    }

    async fn patch(
        &self,
        operation: &'static str,
        path: &str,
        body: &Value,
    ) -> Result<Value, CarrierError> {
        self.send(operation, Method::PATCH, path, &[], Some(body))
            .await
    }

    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, CarrierError> {
        let token = self.tokens.access_token().await?;

        let mut request = self
            .http
            .request(method, self.settings.url(path))
            .header(AUTHORIZATION, token.bearer());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Carrier request could not be sent");
            let message = if e.is_timeout() {
                format!("Request timed out after {}s", self.settings.timeout.as_secs())
            } else {
                e.to_string()
            };
            CarrierError::upstream(operation, message)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Carrier response could not be read");
            CarrierError::upstream(operation, e.to_string()).with_status(status.as_u16())
        })?;
        let body = parse_body(text);

        if !status.is_success() {
            tracing::error!(
                operation,
                status = status.as_u16(),
                upstream = %body,
                "Carrier request failed"
            );
            return Err(
                CarrierError::upstream(operation, format!("Carrier answered {}", status))
                    .with_status(status.as_u16())
                    .with_upstream(body),
            );
        }

        Ok(body)
    }
}

/// Non-JSON bodies are kept as plain strings so they still reach the logs.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn log_shape_error(err: CarrierError) -> CarrierError {
    tracing::error!(
        operation = %err.operation,
        upstream = ?err.upstream,
        "{}",
        err.message
    );
    err
}

#[async_trait]
impl CarrierGateway for SkydropxClient {
    async fn create_quotation(
        &self,
        request: &QuotationRequest,
    ) -> Result<Quotation, CarrierError> {
        const OP: &str = "create_quotation";
        let body = self.post(OP, "/quotations", &wire::quotation_body(request)).await?;
        wire::parse_quotation(OP, &body).map_err(log_shape_error)
    }

    async fn get_quotation(&self, quotation_id: &str) -> Result<Quotation, CarrierError> {
        const OP: &str = "get_quotation";
        let body = self
            .get(OP, &format!("/quotations/{}", quotation_id), &[])
            .await?;
        wire::parse_quotation(OP, &body).map_err(log_shape_error)
    }

    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResource, CarrierError> {
        const OP: &str = "create_shipment";
        let body = self.post(OP, "/shipments", &wire::shipment_body(request)).await?;
        wire::parse_shipment(OP, body).map_err(log_shape_error)
    }

    async fn get_shipment(&self, shipment_id: &str) -> Result<ShipmentResource, CarrierError> {
        const OP: &str = "get_shipment";
        let body = self
            .get(OP, &format!("/shipments/{}", shipment_id), &[])
            .await?;
        wire::parse_shipment(OP, body).map_err(log_shape_error)
    }

    async fn list_shipments(&self, page: u32) -> Result<Value, CarrierError> {
        self.get("list_shipments", "/shipments", &[("page", page.to_string())])
            .await
    }

    async fn track_shipment(
        &self,
        tracking_number: &str,
        carrier_name: &str,
    ) -> Result<Value, CarrierError> {
        self.get(
            "track_shipment",
            "/shipments/tracking",
            &[
                ("tracking_number", tracking_number.to_string()),
                ("carrier_name", carrier_name.to_string()),
            ],
        )
        .await
    }

    async fn cancel_shipment(
        &self,
        shipment_id: &str,
        reason: &str,
    ) -> Result<Value, CarrierError> {
        self.post(
            "cancel_shipment",
            &format!("/shipments/{}/cancellations", shipment_id),
            &json!({ "reason": reason }),
        )
        .await
    }

    async fn protect_shipment(
        &self,
        shipment_id: &str,
        declared_value: f64,
    ) -> Result<Value, CarrierError> {
        self.post(
            "protect_shipment",
            &format!("/shipments/{}/protect", shipment_id),
            &json!({ "declared_value": declared_value }),
        )
        .await
    }

    async fn create_pickup(&self, request: &PickupRequest) -> Result<PickupResource, CarrierError> {
        const OP: &str = "create_pickup";
        let body = self.post(OP, "/pickups", &wire::pickup_body(request)).await?;
        wire::parse_pickup(OP, body).map_err(log_shape_error)
    }

    async fn get_pickup(&self, pickup_id: &str) -> Result<PickupResource, CarrierError> {
        const OP: &str = "get_pickup";
        let body = self.get(OP, &format!("/pickups/{}", pickup_id), &[]).await?;
        wire::parse_pickup(OP, body).map_err(log_shape_error)
    }

    async fn list_pickups(&self, page: u32) -> Result<Value, CarrierError> {
        self.get("list_pickups", "/pickups", &[("page", page.to_string())])
            .await
    }

    async fn pickup_coverage(&self, shipment_id: &str) -> Result<Value, CarrierError> {
        self.get(
            "pickup_coverage",
            "/pickups/coverage",
            &[("shipment_id", shipment_id.to_string())],
        )
        .await
    }

    async fn reschedule_pickup(
        &self,
        pickup_id: &str,
        request: &PickupRequest,
    ) -> Result<PickupResource, CarrierError> {
        const OP: &str = "reschedule_pickup";
        let body = self
            .post(
                OP,
                &format!("/pickups/{}/reschedule", pickup_id),
                &wire::pickup_body(request),
            )
            .await?;
        wire::parse_pickup(OP, body).map_err(log_shape_error)
    }

    async fn list_orders(&self, page: u32) -> Result<Value, CarrierError> {
        self.get("list_orders", "/orders", &[("page", page.to_string())])
            .await
    }

    async fn get_order(&self, order_id: &str) -> Result<Value, CarrierError> {
        self.get("get_order", &format!("/orders/{}", order_id), &[])
            .await
    }

    async fn create_order(&self, order: &Value) -> Result<Value, CarrierError> {
        self.post("create_order", "/orders", order).await
    }

    async fn update_order(&self, order_id: &str, changes: &Value) -> Result<Value, CarrierError> {
        self.patch("update_order", &format!("/orders/{}", order_id), changes)
            .await
    }

    async fn list_products(&self, page: u32) -> Result<Value, CarrierError> {
        self.get("list_products", "/products", &[("page", page.to_string())])
            .await
    }

    async fn update_printing_format(
        &self,
        format: PrintingFormat,
    ) -> Result<Value, CarrierError> {
        self.patch(
            "update_printing_format",
            "/settings/printing_formats",
            &json!({ "printing_format": format }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::skydropx::MockCarrierGateway;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::AccessToken;

    struct FailingTokens;

    #[async_trait]
    impl TokenProvider for FailingTokens {
        async fn access_token(&self) -> Result<AccessToken, CarrierError> {
            Err(CarrierError::authentication("rejected"))
        }
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body("  ".to_string()), Value::Null);
    }

    #[test]
    fn html_body_is_kept_as_string() {
        assert_eq!(
            parse_body("<h1>Bad Gateway</h1>".to_string()),
            Value::String("<h1>Bad Gateway</h1>".to_string())
        );
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(parse_body(r#"{"ok":true}"#.to_string())["ok"], true);
    }

    #[tokio::test]
    async fn authentication_failure_stops_the_call() {
        let client = SkydropxClient::new(
            SkydropxSettings::new("http://127.0.0.1:9", "id", "secret"),
            Arc::new(FailingTokens),
        )
        .unwrap();

        let err = client.list_pickups(1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationFailure);
    }

    #[test]
    fn client_and_mock_share_the_port() {
        fn assert_gateway<T: CarrierGateway>() {}
        assert_gateway::<SkydropxClient>();
        assert_gateway::<MockCarrierGateway>();
    }
}
