//! In-memory doubles for the engine's two seams, plus canned fixtures.
//!
//! `MemoryOrderStore` honours the same version compare-and-swap contract as the real store, so
//! concurrency paths can be exercised without a database. `StaticSource` serves canned records
//! and remembers how it was called.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use bpg_common::AssetAmount;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, GATEWAY_ID},
    traits::{OrderStore, OrderStoreError, TransactionSource, TransactionSourceError},
};

/// A typical on-hold order: 10 USDT expected, memo `ABCD1234EFGH`, owned by `cust-1`.
pub fn sample_order() -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        order_id: OrderId("1001".to_string()),
        order_key: "wc_order_key_1001".to_string(),
        customer_id: "cust-1".to_string(),
        payment_method: GATEWAY_ID.to_string(),
        status: OrderStatusType::OnHold,
        memo: "ABCD1234EFGH".to_string(),
        asset: "USDT".to_string(),
        amount: AssetAmount::from_units(10),
        qr_ref: "qr/1001.png".to_string(),
        locked: false,
        checked: false,
        txid: None,
        paid_at: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct MemoryState {
    orders: HashMap<String, Order>,
    notes: HashMap<String, Vec<String>>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryOrderStore {
    pub async fn add_order(&self, order: Order) {
        let mut state = self.state.lock().unwrap();
        state.orders.insert(order.order_id.as_str().to_string(), order);
    }

    pub async fn notes_for(&self, order_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.notes.get(order_id).cloned().unwrap_or_default()
    }

}

impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: NewOrder, memo: &str, now: DateTime<Utc>) -> Result<Order, OrderStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.orders.contains_key(order.order_id.as_str()) {
            return Err(OrderStoreError::DatabaseError(format!("Duplicate order id {}", order.order_id)));
        }
        state.next_id += 1;
        let stored = Order {
            id: state.next_id,
            order_id: order.order_id.clone(),
            order_key: order.order_key,
            customer_id: order.customer_id,
            payment_method: GATEWAY_ID.to_string(),
            status: OrderStatusType::OnHold,
            memo: memo.to_string(),
            asset: order.asset,
            amount: order.amount,
            qr_ref: order.qr_ref,
            locked: false,
            checked: false,
            txid: None,
            paid_at: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.orders.insert(order.order_id.as_str().to_string(), stored.clone());
        Ok(stored)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.orders.get(order_id.as_str()).cloned())
    }

    async fn update_order(&self, order: &Order) -> Result<Order, OrderStoreError> {
        let mut state = self.state.lock().unwrap();
        let current = state
            .orders
            .get_mut(order.order_id.as_str())
            .ok_or_else(|| OrderStoreError::NotFound(order.order_id.clone()))?;
        if current.version != order.version {
            return Err(OrderStoreError::ConcurrentModification);
        }
        let mut saved = order.clone();
        saved.version += 1;
        saved.updated_at = Utc::now();
        *current = saved.clone();
        Ok(saved)
    }

    async fn append_order_note(&self, order_id: &OrderId, note: &str) -> Result<(), OrderStoreError> {
        let mut state = self.state.lock().unwrap();
        state.notes.entry(order_id.as_str().to_string()).or_default().push(note.to_string());
        Ok(())
    }
}

enum SourceMode {
    Serve { narrow: Vec<Value>, wide: Vec<Value> },
    Reject(String),
    Fail(String),
}

/// A canned [`TransactionSource`]. Windowed fetches serve the `narrow` set, unwindowed fetches
/// the `wide` set. `calls()` reports `(windowed, limit)` per fetch, in order.
#[derive(Clone)]
pub struct StaticSource {
    mode: Arc<SourceMode>,
    configured: bool,
    calls: Arc<Mutex<Vec<(bool, usize)>>>,
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }
}

impl StaticSource {
    fn with_records(narrow: Vec<Value>, wide: Vec<Value>) -> Self {
        Self {
            mode: Arc::new(SourceMode::Serve { narrow, wide }),
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_narrow(records: Vec<Value>) -> Self {
        Self::with_records(records, Vec::new())
    }

    pub fn with_wide(records: Vec<Value>) -> Self {
        Self::with_records(Vec::new(), records)
    }

    pub fn rejecting(msg: &str) -> Self {
        Self {
            mode: Arc::new(SourceMode::Reject(msg.to_string())),
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            mode: Arc::new(SourceMode::Fail(msg.to_string())),
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unconfigured() -> Self {
        let mut source = Self::default();
        source.configured = false;
        source
    }

    pub async fn calls(&self) -> Vec<(bool, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl TransactionSource for StaticSource {
    async fn fetch_transactions(
        &self,
        window: Option<(i64, i64)>,
        limit: usize,
    ) -> Result<Vec<Value>, TransactionSourceError> {
        self.calls.lock().unwrap().push((window.is_some(), limit));
        match &*self.mode {
            SourceMode::Serve { narrow, wide } => {
                let records = if window.is_some() { narrow } else { wide };
                Ok(records.iter().take(limit).cloned().collect())
            },
            SourceMode::Reject(msg) => Err(TransactionSourceError::Rejected(msg.clone())),
            SourceMode::Fail(msg) => Err(TransactionSourceError::Transport(msg.clone())),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
