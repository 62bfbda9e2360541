use thiserror::Error;

use crate::{db_types::OrderId, traits::OrderStoreError};

/// The error taxonomy for one payment check.
///
/// `Config` and `Unauthorized` are rejected before any API call. `Transport` is a transient
/// remote failure; safe to re-invoke, never retried automatically. Explicit remote rejections do
/// not surface here at all: the check treats them as zero records and proceeds to a no-match
/// outcome.
#[derive(Debug, Error)]
pub enum PaymentCheckError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("You are not allowed to access this order.")]
    Unauthorized,
    #[error("Order {0} not found.")]
    OrderNotFound(OrderId),
    #[error("This order did not use the Binance Static QR gateway.")]
    WrongGateway,
    #[error("Could not reach the payment API: {0}")]
    Transport(String),
    #[error("Order store error: {0}")]
    StoreError(#[from] OrderStoreError),
}
