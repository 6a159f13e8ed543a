//! Skydropx Pro carrier adapter.
//!
//! Implements the `CarrierGateway` and `TokenProvider` ports for the Skydropx
//! Pro REST API, including:
//! - OAuth client-credentials authentication
//! - Quotations, shipments and pickups
//! - Order, product and printing-format passthroughs
//!
//! # Security
//!
//! - The client secret and every bearer token are held in `secrecy` types
//! - Tokens are requested per call and never stored
//!
//! # Configuration
//!
//! Built from `CarrierConfig`:
//! - `SKYDROPX_PRO__CARRIER__API_URL`
//! - `SKYDROPX_PRO__CARRIER__API_KEY`
//! - `SKYDROPX_PRO__CARRIER__API_SECRET`

mod authenticator;
mod client;
mod mock_gateway;
mod settings;
pub(crate) mod wire;

pub use authenticator::{extract_token, CredentialAuthenticator};
pub use client::SkydropxClient;
pub use mock_gateway::{MethodCall, MockCarrierGateway};
pub use settings::SkydropxSettings;
