//! Application handlers.
//!
//! Command and query handlers that orchestrate the shipping domain over the
//! carrier gateway.

mod carrier_admin;
mod create_shipment;
mod pickup_lifecycle;
mod quote_shipping_rates;

pub use carrier_admin::{CarrierAdminHandler, ConnectionStatus};
pub use create_shipment::{CreateShipmentCommand, CreateShipmentHandler};
pub use pickup_lifecycle::PickupLifecycleHandler;
pub use quote_shipping_rates::{QuoteShippingRatesCommand, QuoteShippingRatesHandler};
