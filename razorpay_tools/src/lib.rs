//! A thin client for the Razorpay REST API.
//!
//! This crate covers the two interactions the grocery store backend has with the payment gateway:
//! creating a gateway order (a "payment intent" that the storefront checkout widget consumes), and
//! verifying the HMAC signature that Razorpay attaches to a completed payment callback.
//!
//! The crate is deliberately storefront-agnostic. It knows nothing about grocery orders, stock, or
//! users; it only speaks the gateway's wire format.

mod api;
mod config;
mod data_objects;
mod error;
pub mod helpers;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{GatewayOrder, NewGatewayOrder};
pub use error::RazorpayApiError;
