//! Binance Pay API client
//!
//! A thin, signed REST client for the Binance Pay transaction-history endpoint. The gateway uses
//! it to pull recent incoming transfers so that the reconciliation engine can match them against
//! store orders. The client deliberately returns raw JSON records; normalization into a canonical
//! shape is the engine's job.

mod api;
mod config;
mod data_objects;
mod error;
mod signing;

pub use api::{BinancePayApi, RawTransaction};
pub use config::BinanceConfig;
pub use data_objects::PayHistoryEnvelope;
pub use error::BinanceApiError;
pub use signing::{canonical_query, hmac_sha256_hex, signed_query};
