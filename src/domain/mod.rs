//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (error taxonomy, numeric helpers)
//! - `commerce` - Read-only cart, order and fulfillment records from the host
//! - `shipping` - Warehouse grouping, parcels, addresses, quotations,
//!   shipments and pickups

pub mod commerce;
pub mod foundation;
pub mod shipping;
