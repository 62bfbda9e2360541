//! Binance Pay reconciliation engine
//!
//! The engine turns a page of loosely-typed payment-history records into a settlement verdict for
//! one store order, and applies that verdict to the order's state with idempotency guarantees.
//! It is split along the seams of the check pipeline:
//!
//! 1. [`normalize`] maps heterogeneous raw records into one canonical shape. Normalization is
//!    total; missing fields default rather than fail.
//! 2. [`eligibility`] decides whether a canonical record is a candidate match for an order
//!    (direction, status, currency, time window, memo).
//! 3. [`decision`] scans the candidates once and produces a [`decision::Verdict`].
//! 4. [`projector`] converts a verdict into an explicit [`projector::OrderOutcome`] value, which
//!    the check API persists through the [`traits::OrderStore`] seam.
//!
//! [`api::PaymentCheckApi`] orchestrates the whole cycle, including the two-phase fetch through
//! the [`traits::TransactionSource`] seam and the compare-and-swap save that makes concurrent
//! checks for the same order safe.

pub mod api;
pub mod config;
pub mod context;
pub mod db_types;
pub mod decision;
pub mod eligibility;
pub mod errors;
pub mod helpers;
pub mod normalize;
pub mod projector;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{CheckRequestAuth, PaymentCheckApi};
pub use config::CheckConfig;
pub use errors::PaymentCheckError;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteOrderStore;
pub use traits::{OrderStore, OrderStoreError, TransactionSource, TransactionSourceError};
