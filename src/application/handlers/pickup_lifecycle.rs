//! PickupLifecycleHandler - Scheduling, rescheduling and lookup of pickups.

use std::sync::Arc;

use serde_json::Value;

use crate::application::poller::{PollOutcome, TerminalStatePoller};
use crate::domain::foundation::ShippingError;
use crate::domain::shipping::{PickupRequest, PickupResource};
use crate::ports::CarrierGateway;

/// Handler for carrier pickups.
pub struct PickupLifecycleHandler {
    gateway: Arc<dyn CarrierGateway>,
    poller: TerminalStatePoller,
}

impl PickupLifecycleHandler {
    pub fn new(gateway: Arc<dyn CarrierGateway>, poller: TerminalStatePoller) -> Self {
        Self { gateway, poller }
    }

    /// Schedules a pickup and waits until the carrier confirms it.
    ///
    /// Returns the last observed pickup when the budget runs out before
    /// confirmation.
    pub async fn create_pickup(
        &self,
        request: PickupRequest,
    ) -> Result<PickupResource, ShippingError> {
        request.validate()?;

        let pickup = self.gateway.create_pickup(&request).await?;
        tracing::info!(
            pickup_id = %pickup.id,
            shipment_id = %request.reference_shipment_id,
            status = ?pickup.status,
            "Pickup submitted"
        );

        self.await_scheduled(pickup).await
    }

    /// Moves an existing pickup to a new window and waits for confirmation.
    pub async fn reschedule_pickup(
        &self,
        pickup_id: &str,
        request: PickupRequest,
    ) -> Result<PickupResource, ShippingError> {
        require("pickup_id", pickup_id)?;
        request.validate()?;

        let pickup = self.gateway.reschedule_pickup(pickup_id, &request).await?;
        tracing::info!(pickup_id = %pickup.id, status = ?pickup.status, "Pickup rescheduled");

        self.await_scheduled(pickup).await
    }

    pub async fn get_pickup(&self, pickup_id: &str) -> Result<PickupResource, ShippingError> {
        require("pickup_id", pickup_id)?;
        Ok(self.gateway.get_pickup(pickup_id).await?)
    }

    pub async fn list_pickups(&self, page: u32) -> Result<Value, ShippingError> {
        if page == 0 {
            return Err(ShippingError::invalid_request("page", "pages start at 1"));
        }
        Ok(self.gateway.list_pickups(page).await?)
    }

    /// Pickup windows available for a shipment.
    pub async fn pickup_coverage(&self, shipment_id: &str) -> Result<Value, ShippingError> {
        require("shipment_id", shipment_id)?;
        Ok(self.gateway.pickup_coverage(shipment_id).await?)
    }

    async fn await_scheduled(
        &self,
        pickup: PickupResource,
    ) -> Result<PickupResource, ShippingError> {
        let gateway = Arc::clone(&self.gateway);
        let outcome = self
            .poller
            .poll(
                pickup,
                |current| {
                    let gateway = Arc::clone(&gateway);
                    let id = current.id.clone();
                    async move { gateway.get_pickup(&id).await }
                },
                PickupResource::is_scheduled,
            )
            .await;

        match outcome {
            PollOutcome::Terminal { value, .. } => Ok(value),
            PollOutcome::Exhausted { value, attempts } => {
                let err = ShippingError::PollTimeoutExceeded {
                    resource: "pickup".to_string(),
                    id: value.id.clone(),
                    attempts,
                };
                tracing::warn!(code = %err.code(), status = ?value.status, "{}", err);
                Ok(value)
            }
            PollOutcome::Aborted { value, error, .. } => {
                tracing::error!(
                    operation = "get_pickup",
                    pickup_id = %value.id,
                    upstream = ?error.upstream,
                    "Pickup polling failed"
                );
                Err(error.into())
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ShippingError> {
    if value.trim().is_empty() {
        return Err(ShippingError::invalid_request(field, "must not be empty"));
    }
    Ok(())
}
