//! # Binance Pay gateway server
//!
//! HTTP surface for the static-QR payment gateway. It is responsible for:
//! * Serving the storefront's "I have paid" check requests.
//! * Validating anti-forgery tokens before any reconciliation work is done.
//! * Exposing an admin-only debug view of the latest payment record.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/check`: The storefront payment-check route. Always answers HTTP 200; success or failure is
//!   carried in the JSON body.
//! * `/debug/latest-transaction`: Admin-gated diagnostic returning the most recent normalized
//!   payment record.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
