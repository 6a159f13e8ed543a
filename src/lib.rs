//! Skydropx Pro - Carrier integration for a commerce platform
//!
//! This crate quotes, books and tracks parcels through the Skydropx Pro API.
//! Carts are split per warehouse, each warehouse gets its own quotation, and
//! every asynchronous carrier resource is polled until it settles.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
