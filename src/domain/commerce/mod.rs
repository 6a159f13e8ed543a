//! Commerce records consumed by the shipping flows.
//!
//! These mirror the host platform's cart, order and fulfillment payloads.
//! They are read-only inputs: nothing in this crate mutates or persists them.
//! Every field the host may omit is optional so a sparse payload still
//! deserializes; the shipping module applies the fallbacks.

mod records;

pub use records::{
    Cart, Fulfillment, FulfillmentItem, LineItem, Order, ProductInfo, ShippingAddress,
    ShippingMethod, ShippingMethodMetadata, Variant,
};
