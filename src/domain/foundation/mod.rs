//! Foundation module - Shared domain primitives.
//!
//! Contains the error taxonomy and the numeric helpers shared by the
//! commerce and shipping modules.

mod errors;
mod numbers;

pub use errors::{ErrorCode, ErrorEnvelope, ShippingError};
pub use numbers::{digits_only, positive_or};
