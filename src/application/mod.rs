//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every asynchronous carrier resource goes through the shared
//! `TerminalStatePoller`.

pub mod handlers;
pub mod poller;
pub mod services;

pub use handlers::{
    // Rates
    QuoteShippingRatesCommand, QuoteShippingRatesHandler,
    // Shipments
    CreateShipmentCommand, CreateShipmentHandler,
    // Pickups
    PickupLifecycleHandler,
    // Administration
    CarrierAdminHandler, ConnectionStatus,
};
pub use poller::{PollOutcome, PollPolicy, TerminalStatePoller};
pub use services::ShippingServices;
