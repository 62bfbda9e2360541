use std::{fmt::Display, str::FromStr};

use bpg_common::{AssetAmount, DEFAULT_ASSET};
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The gateway identifier stored on orders placed through this gateway. Checks reject orders paid
/// with anything else.
pub const GATEWAY_ID: &str = "binance_static";

//--------------------------------------        OrderId        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatusType {
    /// Awaiting an incoming transfer. The only status a check will act on.
    OnHold,
    /// Payment received; the order is being fulfilled.
    Processing,
    /// The order has been fulfilled.
    Completed,
    /// The order has been cancelled by an operator.
    Cancelled,
}

impl OrderStatusType {
    /// Paid terminal states: a check against an order in one of these re-affirms the lock and
    /// short-circuits.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Processing | Self::Completed)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::OnHold => write!(f, "on-hold"),
            OrderStatusType::Processing => write!(f, "processing"),
            OrderStatusType::Completed => write!(f, "completed"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-hold" => Ok(Self::OnHold),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to on-hold");
            OrderStatusType::OnHold
        })
    }
}

//--------------------------------------        Order          --------------------------------------------------------
/// A store order as persisted by the gateway.
///
/// The reconciliation metadata (memo, asset, expected amount, locked/checked flags, last-matched
/// transaction id) lives directly on the order; there is no transaction ledger beyond `txid`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    /// The order's secret key. Presenting it authorizes a check without being the order's owner.
    pub order_key: String,
    pub customer_id: String,
    pub payment_method: String,
    pub status: OrderStatusType,
    /// The per-order memo the payer must put in the transfer's note field. The primary
    /// correlation key between a transfer and this order.
    pub memo: String,
    /// Uppercase settlement asset symbol (USDT or USDC).
    pub asset: String,
    /// The expected payment amount, snapshotted at checkout.
    pub amount: AssetAmount,
    /// Reference to the uploaded receiving QR image. Opaque to the engine.
    pub qr_ref: String,
    /// One-way flag marking the order as settled. Once set, checks only re-affirm state.
    pub locked: bool,
    /// Set after any check that examined candidate transactions for this order.
    pub checked: bool,
    /// The last-matched transaction id, used for `AlreadyProcessed` detection.
    pub txid: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency token; bumped on every save.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }

    /// Attempt a status transition, honouring the one-way order lifecycle. Returns `true` if the
    /// order is in the requested status afterwards. Transitions out of a paid state, or out of
    /// `cancelled`, are refused; callers that must settle anyway force the status directly.
    pub fn try_transition(&mut self, next: OrderStatusType) -> bool {
        use OrderStatusType::*;
        if self.status == next {
            return true;
        }
        let allowed = matches!((self.status, next), (OnHold, Processing) | (OnHold, Completed) | (Processing, Completed));
        if allowed {
            self.status = next;
        }
        allowed
    }
}

//--------------------------------------       NewOrder        --------------------------------------------------------
/// An order arriving from the storefront at checkout, before the payment memo has been generated
/// and the record persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub order_key: String,
    pub customer_id: String,
    /// The total price of the order in the settlement asset.
    pub amount: AssetAmount,
    /// The asset the customer selected at checkout. Defaults to USDT when empty.
    pub asset: String,
    #[serde(default)]
    pub qr_ref: String,
}

impl NewOrder {
    pub fn new(order_id: OrderId, order_key: String, customer_id: String, amount: AssetAmount) -> Self {
        Self { order_id, order_key, customer_id, amount, asset: DEFAULT_ASSET.to_string(), qr_ref: String::new() }
    }

    pub fn with_asset<S: Into<String>>(mut self, asset: S) -> Self {
        self.asset = asset.into();
        self
    }
}
