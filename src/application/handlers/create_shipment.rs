//! CreateShipmentHandler - Command handler for booking a warehouse's shipment.
//!
//! Uses the rate the customer picked at checkout (stored in the order's
//! shipping-method metadata), submits the shipment and waits for the carrier
//! to finish generating the label.

use std::sync::Arc;

use crate::application::poller::{PollOutcome, TerminalStatePoller};
use crate::domain::commerce::{Fulfillment, Order};
use crate::domain::foundation::ShippingError;
use crate::domain::shipping::{
    declared_value, fulfilled_items_for_warehouse, AddressNormalizer, CustomsProduct,
    PrintingFormat, ShipmentRequest, ShipmentResult, DEFAULT_CONSIGNMENT_NOTE,
    DEFAULT_PACKAGE_TYPE,
};
use crate::ports::CarrierGateway;

/// Command to create the shipment for one warehouse of a fulfillment.
#[derive(Debug, Clone)]
pub struct CreateShipmentCommand {
    pub order: Order,
    /// Destination postal code, resolved by the host.
    pub resolved_zip: String,
    pub fulfillment: Fulfillment,
    pub warehouse_id: String,
}

/// Handler for creating shipments.
pub struct CreateShipmentHandler {
    gateway: Arc<dyn CarrierGateway>,
    addresses: Arc<AddressNormalizer>,
    printing_format: PrintingFormat,
    poller: TerminalStatePoller,
}

impl CreateShipmentHandler {
    pub fn new(
        gateway: Arc<dyn CarrierGateway>,
        addresses: Arc<AddressNormalizer>,
        printing_format: PrintingFormat,
        poller: TerminalStatePoller,
    ) -> Self {
        Self {
            gateway,
            addresses,
            printing_format,
            poller,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateShipmentCommand,
    ) -> Result<ShipmentResult, ShippingError> {
        let request = self.build_request(&cmd)?;

        let shipment = self.gateway.create_shipment(&request).await.map_err(|e| {
            tracing::error!(
                operation = "create_shipment",
                order_id = %cmd.order.id,
                warehouse_id = %cmd.warehouse_id,
                upstream = ?e.upstream,
                "Shipment submission failed"
            );
            ShippingError::from(e)
        })?;

        tracing::info!(
            order_id = %cmd.order.id,
            warehouse_id = %cmd.warehouse_id,
            shipment_id = %shipment.id,
            workflow_status = ?shipment.workflow_status,
            "Shipment submitted"
        );

        let gateway = Arc::clone(&self.gateway);
        let outcome = self
            .poller
            .poll(
                shipment,
                |current| {
                    let gateway = Arc::clone(&gateway);
                    let id = current.id.clone();
                    async move { gateway.get_shipment(&id).await }
                },
                |s| !s.is_in_progress(),
            )
            .await;

        match &outcome {
            PollOutcome::Terminal { value, attempts } => tracing::info!(
                shipment_id = %value.id,
                workflow_status = ?value.workflow_status,
                attempts,
                "Shipment settled"
            ),
            PollOutcome::Exhausted { value, attempts } => {
                let err = ShippingError::PollTimeoutExceeded {
                    resource: "shipment".to_string(),
                    id: value.id.clone(),
                    attempts: *attempts,
                };
                tracing::warn!(code = %err.code(), "{}", err);
            }
            PollOutcome::Aborted { value, error, .. } => tracing::warn!(
                shipment_id = %value.id,
                code = %error.code,
                upstream = ?error.upstream,
                "Shipment polling aborted, returning last known state"
            ),
        }

        Ok(ShipmentResult::from_resource(outcome.into_value()))
    }

    /// Validates the command and builds the carrier request. No I/O.
    fn build_request(&self, cmd: &CreateShipmentCommand) -> Result<ShipmentRequest, ShippingError> {
        let warehouse_id = cmd.warehouse_id.as_str();

        let items = fulfilled_items_for_warehouse(&cmd.order, &cmd.fulfillment, warehouse_id);
        if items.is_empty() {
            tracing::warn!(
                order_id = %cmd.order.id,
                fulfillment_id = %cmd.fulfillment.id,
                warehouse_id,
                "No fulfilled items ship from this warehouse"
            );
            return Err(ShippingError::no_matching_warehouse_items(warehouse_id));
        }

        let metadata = cmd
            .order
            .shipping_method_for(warehouse_id)
            .map(|method| &method.metadata);
        let (quotation_id, rate_id) = match metadata
            .and_then(|m| Some((m.quotation_id()?, m.selected_rate_id()?)))
        {
            Some(selection) => selection,
            None => {
                tracing::warn!(
                    order_id = %cmd.order.id,
                    warehouse_id,
                    "Order has no selected rate for this warehouse"
                );
                return Err(ShippingError::no_applicable_rate(warehouse_id));
            }
        };

        let address_to = self
            .addresses
            .destination_for_order(&cmd.order, &cmd.resolved_zip)
            .filter(|address| address.has_postal_code())
            .ok_or_else(|| {
                tracing::warn!(
                    order_id = %cmd.order.id,
                    warehouse_id,
                    "Order has no usable destination address"
                );
                ShippingError::InvalidDestinationAddress
            })?;

        Ok(ShipmentRequest {
            quotation_id,
            rate_id,
            protected: false,
            declared_value: declared_value(items.iter().copied()),
            printing_format: self.printing_format,
            address_from: self.addresses.origin_address(),
            address_to,
            consignment_note: DEFAULT_CONSIGNMENT_NOTE.to_string(),
            package_type: DEFAULT_PACKAGE_TYPE.to_string(),
            products: items.into_iter().map(CustomsProduct::from_line_item).collect(),
        })
    }
}
