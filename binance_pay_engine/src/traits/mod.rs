//! The engine's two external seams: the order store and the transaction source.
//!
//! The engine never mutates storefront state directly. A check produces an explicit outcome
//! value, and persistence goes through [`OrderStore`], which any backend can implement. Likewise
//! the engine never talks HTTP; [`TransactionSource`] abstracts the payment-history API so the
//! whole check pipeline is testable with canned records.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId};

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} not found")]
    NotFound(OrderId),
    #[error("The order was modified by a concurrent check")]
    ConcurrentModification,
}

#[derive(Debug, Error)]
pub enum TransactionSourceError {
    /// Network/timeout failure. Surfaced to the caller as "try again later".
    #[error("Transport error: {0}")]
    Transport(String),
    /// The API answered with an explicit failure envelope. Treated as zero records by the check.
    #[error("The payment API rejected the request: {0}")]
    Rejected(String),
}

/// Persistence seam for order records.
///
/// `update_order` must be a compare-and-swap on the order's `version` field: the write succeeds
/// only when the stored version still equals `order.version`, and bumps it. This is what makes
/// two concurrent checks for the same order safe; the loser observes
/// [`OrderStoreError::ConcurrentModification`] and re-reads.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Persist a new order in the on-hold state with the given payment memo. Returns the stored
    /// record.
    async fn insert_order(&self, order: NewOrder, memo: &str, now: DateTime<Utc>) -> Result<Order, OrderStoreError>;

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Version-guarded save. Returns the stored record with its bumped version.
    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError>;

    /// Append an operator-visible audit note to the order's history.
    async fn append_order_note(&self, order_id: &OrderId, note: &str) -> Result<(), OrderStoreError>;
}

/// Read seam over the remote payment-history API.
#[allow(async_fn_in_trait)]
pub trait TransactionSource {
    /// Fetch up to `limit` raw records, optionally restricted to an inclusive epoch-millisecond
    /// window.
    async fn fetch_transactions(
        &self,
        window: Option<(i64, i64)>,
        limit: usize,
    ) -> Result<Vec<Value>, TransactionSourceError>;

    /// Whether API credentials are present. Checks fail fast with a configuration error when not.
    fn is_configured(&self) -> bool;
}
