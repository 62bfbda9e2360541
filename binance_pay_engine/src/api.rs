//! Check orchestration.
//!
//! [`PaymentCheckApi`] wires the pipeline together for one caller-initiated check: load and
//! authorize the order, short-circuit terminal states, derive the payment context, run the
//! two-phase fetch, normalize and filter the records, decide, project, and persist through the
//! version-guarded store.

use std::fmt::Debug;

use bpg_common::{constant_time_eq, DEFAULT_ASSET, SUPPORTED_ASSETS};
use chrono::Utc;
use log::*;

use crate::{
    config::CheckConfig,
    context::OrderPaymentContext,
    db_types::{NewOrder, Order, OrderId, OrderStatusType, GATEWAY_ID},
    decision::decide,
    eligibility::is_eligible,
    errors::PaymentCheckError,
    helpers::generate_memo,
    normalize::{normalize, CanonicalTransaction},
    projector::{apply, CheckOutcome},
    traits::{OrderStore, OrderStoreError, TransactionSource, TransactionSourceError},
};

/// The caller's claim to the order: the storefront passes the logged-in customer id, an
/// anonymous caller must present the order key. Either one suffices.
#[derive(Debug, Clone, Default)]
pub struct CheckRequestAuth {
    pub customer_id: Option<String>,
    pub order_key: Option<String>,
}

pub struct PaymentCheckApi<S, T> {
    store: S,
    source: T,
    config: CheckConfig,
}

impl<S, T> Debug for PaymentCheckApi<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentCheckApi")
    }
}

impl<S, T> PaymentCheckApi<S, T>
where
    S: OrderStore,
    T: TransactionSource,
{
    pub fn new(store: S, source: T, config: CheckConfig) -> Self {
        Self { store, source, config }
    }

    /// Intake a new order at checkout: validate the selected asset, generate the payment memo,
    /// and persist the order on hold.
    pub async fn place_order(&self, mut order: NewOrder) -> Result<Order, PaymentCheckError> {
        order.asset = order.asset.trim().to_uppercase();
        if order.asset.is_empty() {
            order.asset = DEFAULT_ASSET.to_string();
        }
        if !SUPPORTED_ASSETS.contains(&order.asset.as_str()) {
            return Err(PaymentCheckError::Config(format!("Unsupported settlement asset: {}", order.asset)));
        }
        if order.amount.value() <= 0 {
            return Err(PaymentCheckError::Config("Order amount must be positive.".to_string()));
        }
        let memo = generate_memo(&order.order_key, &order.order_id);
        let order = self.store.insert_order(order, &memo, Utc::now()).await?;
        info!("Order {} placed on hold with memo {}", order.order_id, order.memo);
        Ok(order)
    }

    /// Run one payment check for `order_id` on behalf of the caller described by `auth`.
    ///
    /// Always resolves to a [`CheckOutcome`] unless the request itself is invalid (unknown order,
    /// unauthorized caller, missing configuration) or the payment API was unreachable.
    pub async fn check_order(&self, order_id: &OrderId, auth: &CheckRequestAuth) -> Result<CheckOutcome, PaymentCheckError> {
        let order = self
            .store
            .fetch_order_by_order_id(order_id)
            .await?
            .ok_or_else(|| PaymentCheckError::OrderNotFound(order_id.clone()))?;
        authorize(&order, auth)?;
        if order.payment_method != GATEWAY_ID {
            return Err(PaymentCheckError::WrongGateway);
        }

        // Already settled: re-affirm the lock if a rollback cleared it, and stop.
        if order.is_paid() {
            if !order.locked {
                let mut relocked = order.clone();
                relocked.locked = true;
                self.save_reaffirmation(relocked).await;
            }
            return Ok(already_processed_outcome(order.status));
        }
        if order.status != OrderStatusType::OnHold {
            return Ok(CheckOutcome {
                done: false,
                status: order.status,
                lock: false,
                message: "Order is not On-Hold. Please contact the merchant.".to_string(),
            });
        }
        // Terminal states answer above without touching the client; only a live check needs
        // working credentials.
        if !self.source.is_configured() {
            return Err(PaymentCheckError::Config("API keys are not configured or client unavailable.".to_string()));
        }

        let now = Utc::now();
        let ctx = OrderPaymentContext::for_order(&order, now, self.config.lookback_days)?;
        let rows = self.fetch_two_phase(&ctx).await?;
        let candidates: Vec<CanonicalTransaction> =
            rows.iter().map(normalize).filter(|tx| is_eligible(tx, &ctx)).collect();
        debug!("Order {}: {} of {} fetched record(s) are candidates", order.order_id, candidates.len(), rows.len());
        let verdict = decide(&order, &candidates, &ctx);
        let projection = apply(&order, &verdict, &ctx, now);

        if !projection.mutated {
            return Ok(projection.outcome);
        }
        match self.store.update_order(&projection.order).await {
            Ok(_) => {
                if let Some(note) = &projection.audit_note {
                    self.store.append_order_note(order_id, note).await?;
                }
                Ok(projection.outcome)
            },
            Err(OrderStoreError::ConcurrentModification) => {
                // A parallel check won the race. Trust its result rather than re-applying ours.
                warn!("Order {} was modified concurrently during a check", order_id);
                let current = self
                    .store
                    .fetch_order_by_order_id(order_id)
                    .await?
                    .ok_or_else(|| PaymentCheckError::OrderNotFound(order_id.clone()))?;
                if current.is_paid() {
                    Ok(already_processed_outcome(current.status))
                } else {
                    Ok(CheckOutcome {
                        done: false,
                        status: current.status,
                        lock: current.locked,
                        message: "The order was updated by another check. Please try again.".to_string(),
                    })
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// The single most-recent normalized record, for the admin debug window. Records are sorted
    /// by timestamp descending; the sort is stable, so zero-timestamp ties keep fetch order.
    pub async fn latest_transaction(&self) -> Result<Option<CanonicalTransaction>, PaymentCheckError> {
        if !self.source.is_configured() {
            return Err(PaymentCheckError::Config("API keys are not configured or client unavailable.".to_string()));
        }
        let rows = match self.source.fetch_transactions(None, self.config.fallback_fetch_limit).await {
            Ok(rows) => rows,
            Err(TransactionSourceError::Rejected(msg)) => {
                warn!("Payment API rejected the debug fetch: {msg}");
                Vec::new()
            },
            Err(TransactionSourceError::Transport(msg)) => return Err(PaymentCheckError::Transport(msg)),
        };
        let mut records: Vec<CanonicalTransaction> = rows.iter().map(normalize).collect();
        records.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(records.into_iter().next())
    }

    /// Narrow window first; only when it yields zero records, a second unwindowed call with a
    /// larger reach. The fallback exists because some transaction subtypes (notably peer-to-peer
    /// transfers) never populate their timestamp field and would be invisible to a windowed
    /// query. An explicit remote rejection counts as zero records.
    async fn fetch_two_phase(&self, ctx: &OrderPaymentContext) -> Result<Vec<serde_json::Value>, PaymentCheckError> {
        let window = Some((ctx.window_start_ms, ctx.window_end_ms));
        let rows = self.fetch_tolerating_rejection(window, self.config.windowed_fetch_limit).await?;
        if !rows.is_empty() {
            return Ok(rows);
        }
        self.fetch_tolerating_rejection(None, self.config.fallback_fetch_limit).await
    }

    async fn fetch_tolerating_rejection(
        &self,
        window: Option<(i64, i64)>,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, PaymentCheckError> {
        match self.source.fetch_transactions(window, limit).await {
            Ok(rows) => Ok(rows),
            Err(TransactionSourceError::Rejected(msg)) => {
                warn!("Payment API rejected the fetch, continuing with zero records: {msg}");
                Ok(Vec::new())
            },
            Err(TransactionSourceError::Transport(msg)) => Err(PaymentCheckError::Transport(msg)),
        }
    }

    /// Best-effort save of a lock re-affirmation. Losing this race is fine: the winner has
    /// already persisted an equivalent or stronger state.
    async fn save_reaffirmation(&self, order: Order) {
        match self.store.update_order(&order).await {
            Ok(_) | Err(OrderStoreError::ConcurrentModification) => {},
            Err(e) => warn!("Could not re-affirm lock on order {}: {e}", order.order_id),
        }
    }
}

fn authorize(order: &Order, auth: &CheckRequestAuth) -> Result<(), PaymentCheckError> {
    if let Some(customer_id) = &auth.customer_id {
        if !customer_id.is_empty() && customer_id == &order.customer_id {
            return Ok(());
        }
    }
    if let Some(key) = &auth.order_key {
        if !key.is_empty() && constant_time_eq(key, &order.order_key) {
            return Ok(());
        }
    }
    Err(PaymentCheckError::Unauthorized)
}

fn already_processed_outcome(status: OrderStatusType) -> CheckOutcome {
    CheckOutcome { done: true, status, lock: true, message: "Order already processed.".to_string() }
}
