//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application layer and the outside world. Adapters implement these ports.
//!
//! ## Carrier Ports
//!
//! - `CarrierGateway` - Remote carrier API (quotations, shipments, pickups,
//!   passthroughs)
//! - `TokenProvider` - Bearer tokens for the carrier API
//! - `CarrierError` - Failure of a single remote call

mod carrier_error;
mod carrier_gateway;
mod token_provider;

pub use carrier_error::CarrierError;
pub use carrier_gateway::CarrierGateway;
pub use token_provider::{AccessToken, TokenProvider};
