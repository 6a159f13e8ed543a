//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application layer to external systems:
//! - `skydropx` - Skydropx Pro HTTP client, authenticator and test mock

pub mod skydropx;

pub use skydropx::{CredentialAuthenticator, MockCarrierGateway, SkydropxClient, SkydropxSettings};
