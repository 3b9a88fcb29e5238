//! # Grocery store server
//! This crate hosts the HTTP surface of the grocery store backend. It is responsible for:
//! * issuing and validating access tokens,
//! * routing authenticated requests to the engine APIs (catalog, orders, accounts, reports),
//! * creating payment intents on the gateway and verifying payment callbacks,
//! * rendering PDF invoices.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod gateway;
pub mod invoice;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
