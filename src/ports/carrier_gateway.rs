//! Carrier gateway port.
//!
//! Defines the contract for the remote carrier API (Skydropx Pro).
//! Implementations authenticate every call themselves; callers never handle
//! tokens.
//!
//! # Design
//!
//! - **Typed where orchestrated**: quotations, shipments and pickups come back
//!   as domain resources because the handlers poll and filter them
//! - **Raw where passed through**: listings, tracking, orders and products are
//!   returned as the carrier's JSON untouched

use async_trait::async_trait;
use serde_json::Value;

use super::CarrierError;
use crate::domain::shipping::{
    PickupRequest, PickupResource, PrintingFormat, Quotation, QuotationRequest, ShipmentRequest,
    ShipmentResource,
};

/// Port for the carrier API.
#[async_trait]
pub trait CarrierGateway: Send + Sync {
    // Quotations

    /// Submit a quotation. The result may still be incomplete.
    async fn create_quotation(&self, request: &QuotationRequest)
        -> Result<Quotation, CarrierError>;

    /// Re-fetch a quotation by id.
    async fn get_quotation(&self, quotation_id: &str) -> Result<Quotation, CarrierError>;

    // Shipments

    /// Submit a shipment. Label generation usually continues asynchronously.
    async fn create_shipment(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResource, CarrierError>;

    async fn get_shipment(&self, shipment_id: &str) -> Result<ShipmentResource, CarrierError>;

    async fn list_shipments(&self, page: u32) -> Result<Value, CarrierError>;

    async fn track_shipment(
        &self,
        tracking_number: &str,
        carrier_name: &str,
    ) -> Result<Value, CarrierError>;

    async fn cancel_shipment(&self, shipment_id: &str, reason: &str)
        -> Result<Value, CarrierError>;

    /// Buy insurance for an existing shipment.
    async fn protect_shipment(
        &self,
        shipment_id: &str,
        declared_value: f64,
    ) -> Result<Value, CarrierError>;

    // Pickups

    async fn create_pickup(&self, request: &PickupRequest) -> Result<PickupResource, CarrierError>;

    async fn get_pickup(&self, pickup_id: &str) -> Result<PickupResource, CarrierError>;

    async fn list_pickups(&self, page: u32) -> Result<Value, CarrierError>;

    /// Pickup windows available for a shipment's origin.
    async fn pickup_coverage(&self, shipment_id: &str) -> Result<Value, CarrierError>;

    async fn reschedule_pickup(
        &self,
        pickup_id: &str,
        request: &PickupRequest,
    ) -> Result<PickupResource, CarrierError>;

    // Passthroughs

    async fn list_orders(&self, page: u32) -> Result<Value, CarrierError>;

    async fn get_order(&self, order_id: &str) -> Result<Value, CarrierError>;

    async fn create_order(&self, order: &Value) -> Result<Value, CarrierError>;

    async fn update_order(&self, order_id: &str, changes: &Value) -> Result<Value, CarrierError>;

    async fn list_products(&self, page: u32) -> Result<Value, CarrierError>;

    async fn update_printing_format(&self, format: PrintingFormat)
        -> Result<Value, CarrierError>;
}
