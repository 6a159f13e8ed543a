//! Mock carrier gateway for testing.
//!
//! Provides a scriptable implementation of `CarrierGateway` (and
//! `TokenProvider`) for unit and integration tests. Supports:
//! - Scripted quotation, shipment and pickup sequences
//! - Error injection per method
//! - Call tracking and captured request bodies
//!
//! Poll sequences are consumed front to back and the last entry repeats, so a
//! single scripted `in_progress` shipment stays in progress forever.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::shipping::{
    PickupRequest, PickupResource, PrintingFormat, Quotation, QuotationRequest, ShipmentRequest,
    ShipmentResource,
};
use crate::ports::{AccessToken, CarrierError, CarrierGateway, TokenProvider};

/// Mock carrier gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockCarrierGateway::new();
/// mock.push_created_quotation(incomplete_quotation("quo_1"));
/// mock.push_quotation_poll("quo_1", completed_quotation("quo_1"));
///
/// let handler = QuoteShippingRatesHandler::new(Arc::new(mock.clone()), ...);
/// handler.handle(QuoteShippingRatesCommand { cart }).await;
///
/// assert_eq!(mock.call_count("get_quotation"), 1);
/// ```
#[derive(Default)]
pub struct MockCarrierGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    created_quotations: VecDeque<Quotation>,
    quotation_polls: HashMap<String, VecDeque<Quotation>>,

    created_shipment: Option<ShipmentResource>,
    shipment_polls: HashMap<String, VecDeque<ShipmentResource>>,

    created_pickup: Option<PickupResource>,
    rescheduled_pickup: Option<PickupResource>,
    pickup_polls: HashMap<String, VecDeque<PickupResource>>,

    /// Canned bodies for passthrough methods, by method name.
    responses: HashMap<String, Value>,

    /// Error to return on the next call to any method.
    next_error: Option<CarrierError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, CarrierError>,

    call_log: Vec<MethodCall>,
    quotation_requests: Vec<QuotationRequest>,
    shipment_requests: Vec<ShipmentRequest>,
    pickup_requests: Vec<PickupRequest>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockCarrierGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shipment resource with a JSON:API payload.
    pub fn shipment_resource(id: &str, workflow_status: &str) -> ShipmentResource {
        ShipmentResource {
            id: id.to_string(),
            workflow_status: Some(workflow_status.to_string()),
            payload: json!({
                "data": { "id": id, "attributes": { "workflow_status": workflow_status } }
            }),
        }
    }

    /// Pickup resource with a JSON:API payload.
    pub fn pickup_resource(id: &str, status: &str) -> PickupResource {
        PickupResource {
            id: id.to_string(),
            status: Some(status.to_string()),
            payload: json!({ "data": { "id": id, "attributes": { "status": status } } }),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Queue the result of the next `create_quotation` call.
    pub fn push_created_quotation(&self, quotation: Quotation) {
        self.inner
            .lock()
            .unwrap()
            .created_quotations
            .push_back(quotation);
    }

    /// Append a state to the poll sequence of a quotation.
    pub fn push_quotation_poll(&self, quotation_id: &str, quotation: Quotation) {
        self.inner
            .lock()
            .unwrap()
            .quotation_polls
            .entry(quotation_id.to_string())
            .or_default()
            .push_back(quotation);
    }

    pub fn set_created_shipment(&self, shipment: ShipmentResource) {
        self.inner.lock().unwrap().created_shipment = Some(shipment);
    }

    pub fn push_shipment_poll(&self, shipment_id: &str, shipment: ShipmentResource) {
        self.inner
            .lock()
            .unwrap()
            .shipment_polls
            .entry(shipment_id.to_string())
            .or_default()
            .push_back(shipment);
    }

    pub fn set_created_pickup(&self, pickup: PickupResource) {
        self.inner.lock().unwrap().created_pickup = Some(pickup);
    }

    pub fn set_rescheduled_pickup(&self, pickup: PickupResource) {
        self.inner.lock().unwrap().rescheduled_pickup = Some(pickup);
    }

    pub fn push_pickup_poll(&self, pickup_id: &str, pickup: PickupResource) {
        self.inner
            .lock()
            .unwrap()
            .pickup_polls
            .entry(pickup_id.to_string())
            .or_default()
            .push_back(pickup);
    }

    /// Body returned by a passthrough method.
    pub fn set_response(&self, method: &str, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert(method.to_string(), body);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: CarrierError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: CarrierError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Number of calls that would have reached the network.
    pub fn remote_call_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method != "access_token")
            .count()
    }

    pub fn quotation_requests(&self) -> Vec<QuotationRequest> {
        self.inner.lock().unwrap().quotation_requests.clone()
    }

    pub fn shipment_requests(&self) -> Vec<ShipmentRequest> {
        self.inner.lock().unwrap().shipment_requests.clone()
    }

    pub fn pickup_requests(&self) -> Vec<PickupRequest> {
        self.inner.lock().unwrap().pickup_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), CarrierError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn passthrough(&self, method: &str, args: Vec<String>) -> Result<Value, CarrierError> {
        self.record_call(method, args);
        self.check_error(method)?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| json!({ "data": [] })))
    }
}

/// Next state of a poll sequence; the last one repeats.
fn next_state<T: Clone>(queue: Option<&mut VecDeque<T>>) -> Option<T> {
    let queue = queue?;
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn not_found(operation: &str, id: &str) -> CarrierError {
    CarrierError::upstream(operation, format!("{} not found", id))
        .with_status(404)
        .with_upstream(json!({ "errors": [{ "detail": "Not found" }] }))
}

impl Clone for MockCarrierGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl TokenProvider for MockCarrierGateway {
    async fn access_token(&self) -> Result<AccessToken, CarrierError> {
        self.record_call("access_token", vec![]);
        self.check_error("access_token")?;
        Ok(AccessToken::new("mock-token"))
    }
}

#[async_trait]
impl CarrierGateway for MockCarrierGateway {
    async fn create_quotation(
        &self,
        request: &QuotationRequest,
    ) -> Result<Quotation, CarrierError> {
        self.record_call(
            "create_quotation",
            vec![request.address_to.postal_code.clone()],
        );
        self.check_error("create_quotation")?;

        let mut state = self.inner.lock().unwrap();
        state.quotation_requests.push(request.clone());
        Ok(state.created_quotations.pop_front().unwrap_or_else(|| Quotation {
            id: format!("quo_mock_{}", uuid::Uuid::new_v4().simple()),
            is_completed: true,
            rates: vec![],
        }))
    }

    async fn get_quotation(&self, quotation_id: &str) -> Result<Quotation, CarrierError> {
        self.record_call("get_quotation", vec![quotation_id.to_string()]);
        self.check_error("get_quotation")?;

        let mut state = self.inner.lock().unwrap();
        next_state(state.quotation_polls.get_mut(quotation_id))
            .ok_or_else(|| not_found("get_quotation", quotation_id))
    }

    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResource, CarrierError> {
        self.record_call(
            "create_shipment",
            vec![request.quotation_id.clone(), request.rate_id.clone()],
        );
        self.check_error("create_shipment")?;

        let mut state = self.inner.lock().unwrap();
        state.shipment_requests.push(request.clone());
        Ok(state
            .created_shipment
            .clone()
            .unwrap_or_else(|| Self::shipment_resource("shp_mock", "success")))
    }

    async fn get_shipment(&self, shipment_id: &str) -> Result<ShipmentResource, CarrierError> {
        self.record_call("get_shipment", vec![shipment_id.to_string()]);
        self.check_error("get_shipment")?;

        let mut state = self.inner.lock().unwrap();
        next_state(state.shipment_polls.get_mut(shipment_id))
            .ok_or_else(|| not_found("get_shipment", shipment_id))
    }

    async fn list_shipments(&self, page: u32) -> Result<Value, CarrierError> {
        self.passthrough("list_shipments", vec![page.to_string()])
    }

    async fn track_shipment(
        &self,
        tracking_number: &str,
        carrier_name: &str,
    ) -> Result<Value, CarrierError> {
        self.passthrough(
            "track_shipment",
            vec![tracking_number.to_string(), carrier_name.to_string()],
        )
    }

    async fn cancel_shipment(
        &self,
        shipment_id: &str,
        reason: &str,
    ) -> Result<Value, CarrierError> {
        self.passthrough(
            "cancel_shipment",
            vec![shipment_id.to_string(), reason.to_string()],
        )
    }

    async fn protect_shipment(
        &self,
        shipment_id: &str,
        declared_value: f64,
    ) -> Result<Value, CarrierError> {
        self.passthrough(
            "protect_shipment",
            vec![shipment_id.to_string(), declared_value.to_string()],
        )
    }

    async fn create_pickup(&self, request: &PickupRequest) -> Result<PickupResource, CarrierError> {
        self.record_call(
            "create_pickup",
            vec![request.reference_shipment_id.clone()],
        );
        self.check_error("create_pickup")?;

        let mut state = self.inner.lock().unwrap();
        state.pickup_requests.push(request.clone());
        Ok(state
            .created_pickup
            .clone()
            .unwrap_or_else(|| Self::pickup_resource("pk_mock", "scheduled")))
    }

    async fn get_pickup(&self, pickup_id: &str) -> Result<PickupResource, CarrierError> {
        self.record_call("get_pickup", vec![pickup_id.to_string()]);
        self.check_error("get_pickup")?;

        let mut state = self.inner.lock().unwrap();
        next_state(state.pickup_polls.get_mut(pickup_id))
            .ok_or_else(|| not_found("get_pickup", pickup_id))
    }

    async fn list_pickups(&self, page: u32) -> Result<Value, CarrierError> {
        self.passthrough("list_pickups", vec![page.to_string()])
    }

    async fn pickup_coverage(&self, shipment_id: &str) -> Result<Value, CarrierError> {
        self.passthrough("pickup_coverage", vec![shipment_id.to_string()])
    }

    async fn reschedule_pickup(
        &self,
        pickup_id: &str,
        request: &PickupRequest,
    ) -> Result<PickupResource, CarrierError> {
        self.record_call(
            "reschedule_pickup",
            vec![pickup_id.to_string(), request.reference_shipment_id.clone()],
        );
        self.check_error("reschedule_pickup")?;

        let mut state = self.inner.lock().unwrap();
        state.pickup_requests.push(request.clone());
        Ok(state
            .rescheduled_pickup
            .clone()
            .unwrap_or_else(|| Self::pickup_resource(pickup_id, "scheduled")))
    }

    async fn list_orders(&self, page: u32) -> Result<Value, CarrierError> {
        self.passthrough("list_orders", vec![page.to_string()])
    }

    async fn get_order(&self, order_id: &str) -> Result<Value, CarrierError> {
        self.passthrough("get_order", vec![order_id.to_string()])
    }

    async fn create_order(&self, order: &Value) -> Result<Value, CarrierError> {
        self.passthrough("create_order", vec![order.to_string()])
    }

    async fn update_order(&self, order_id: &str, changes: &Value) -> Result<Value, CarrierError> {
        self.passthrough(
            "update_order",
            vec![order_id.to_string(), changes.to_string()],
        )
    }

    async fn list_products(&self, page: u32) -> Result<Value, CarrierError> {
        self.passthrough("list_products", vec![page.to_string()])
    }

    async fn update_printing_format(
        &self,
        format: PrintingFormat,
    ) -> Result<Value, CarrierError> {
        self.passthrough("update_printing_format", vec![format!("{:?}", format)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn poll_sequence_repeats_last_state() {
        let mock = MockCarrierGateway::new();
        mock.push_shipment_poll(
            "shp_1",
            MockCarrierGateway::shipment_resource("shp_1", "in_progress"),
        );
        mock.push_shipment_poll("shp_1", MockCarrierGateway::shipment_resource("shp_1", "success"));

        let first = mock.get_shipment("shp_1").await.unwrap();
        let second = mock.get_shipment("shp_1").await.unwrap();
        let third = mock.get_shipment("shp_1").await.unwrap();

        assert!(first.is_in_progress());
        assert!(second.is_successful());
        assert!(third.is_successful());
        assert_eq!(mock.call_count("get_shipment"), 3);
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let mock = MockCarrierGateway::new();
        let err = mock.get_pickup("pk_404").await.unwrap_err();
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn method_error_is_sticky_and_global_error_is_consumed() {
        let mock = MockCarrierGateway::new();
        mock.set_method_error("list_orders", CarrierError::upstream("list_orders", "boom"));
        mock.set_error(CarrierError::upstream("any", "once"));

        assert!(mock.list_products(1).await.is_err());
        assert!(mock.list_products(1).await.is_ok());
        assert!(mock.list_orders(1).await.is_err());
        assert!(mock.list_orders(1).await.is_err());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let mock = MockCarrierGateway::new();
        let clone = mock.clone();
        clone.list_pickups(2).await.unwrap();

        assert!(mock.was_called("list_pickups"));
        assert_eq!(mock.calls()[0].args, vec!["2"]);
    }
}
