//! Applies a settlement verdict to order state.
//!
//! The projector never touches the store. It returns an [`OrderOutcome`] value carrying the
//! mutated order, the audit note to append, and the client-facing response; the check API decides
//! how (and whether) to persist it. This keeps the decision logic unit-testable without a live
//! order store.

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::{
    context::OrderPaymentContext,
    db_types::{Order, OrderStatusType},
    decision::Verdict,
};

/// The client-facing result of one check, serialized into the response envelope by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// True when the order has reached a paid terminal state and polling can stop.
    pub done: bool,
    pub status: OrderStatusType,
    pub lock: bool,
    pub message: String,
}

/// A projected order mutation. `mutated` is false for verdicts that change nothing (`NoMatch`);
/// the caller must not save in that case.
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub order: Order,
    pub outcome: CheckOutcome,
    pub mutated: bool,
    pub audit_note: Option<String>,
}

/// Force the order into its settled shape. Used by both the `Settled` path and the
/// `AlreadyProcessed` re-drive after a manual rollback.
fn settle(order: &mut Order, txid: &str, now: DateTime<Utc>) {
    if !txid.is_empty() {
        order.txid = Some(txid.to_string());
    }
    if !order.is_paid() && !order.try_transition(OrderStatusType::Processing) {
        // The state machine refused (operator moved the order somewhere unexpected). Push it
        // through anyway: a verified payment must always land on a paid status.
        order.status = OrderStatusType::Processing;
    }
    if order.paid_at.is_none() {
        order.paid_at = Some(now);
    }
    order.locked = true;
    order.checked = true;
}

fn ensure_on_hold(order: &mut Order) {
    if order.status != OrderStatusType::OnHold {
        order.status = OrderStatusType::OnHold;
    }
}

/// Apply `verdict` to a copy of `order`, producing the outcome to persist and report.
///
/// Safe to call twice with the same `Settled` verdict: the second application finds the order
/// already locked and paid and changes nothing further (and in practice the second check
/// short-circuits earlier, via `AlreadyProcessed` or the terminal-state guard).
pub fn apply(order: &Order, verdict: &Verdict, ctx: &OrderPaymentContext, now: DateTime<Utc>) -> OrderOutcome {
    let mut order = order.clone();
    match verdict {
        Verdict::Settled { txid, amount } => {
            settle(&mut order, txid, now);
            let diff = (*amount - ctx.expected_amount).abs();
            info!("Order {} settled by transaction [{txid}] for {amount} {}", order.order_id, ctx.expected_asset);
            let audit_note = format!(
                "Binance Pay received: {amount} {} | Diff {diff} (<{}) | Tx: {}",
                ctx.expected_asset,
                ctx.match_threshold,
                if txid.is_empty() { "-" } else { txid.as_str() },
            );
            OrderOutcome {
                outcome: CheckOutcome {
                    done: true,
                    status: order.status,
                    lock: true,
                    message: "Payment verified. Page will refresh.".to_string(),
                },
                order,
                mutated: true,
                audit_note: Some(audit_note),
            }
        },
        Verdict::AlreadyProcessed { txid } => {
            let message = "This transaction was already processed.".to_string();
            if order.is_paid() {
                // Only re-affirm the lock if a prior rollback left it unset.
                let mutated = !order.locked;
                order.locked = true;
                OrderOutcome {
                    outcome: CheckOutcome { done: true, status: order.status, lock: true, message },
                    order,
                    mutated,
                    audit_note: None,
                }
            } else {
                // Manual rollback to on-hold with a stale transaction id: re-drive the forced
                // settlement path rather than treating the spent transaction as a new payment.
                settle(&mut order, txid, now);
                info!("Order {} re-settled after manual rollback (transaction [{txid}])", order.order_id);
                OrderOutcome {
                    outcome: CheckOutcome { done: true, status: order.status, lock: true, message },
                    order,
                    mutated: true,
                    audit_note: Some("Force update after Binance Pay verification.".to_string()),
                }
            }
        },
        Verdict::Underpaid { shortfall, txid: _ } => {
            ensure_on_hold(&mut order);
            order.checked = true;
            let asset = &ctx.expected_asset;
            let audit_note =
                format!("(Binance Pay) Underpaid {shortfall} {asset} (>={}). Order remains On-Hold.", ctx.match_threshold);
            OrderOutcome {
                outcome: CheckOutcome {
                    done: false,
                    status: order.status,
                    lock: false,
                    message: format!("Underpaid {shortfall} {asset}. Order remains On-Hold."),
                },
                order,
                mutated: true,
                audit_note: Some(audit_note),
            }
        },
        Verdict::Overpaid { excess, txid } => {
            ensure_on_hold(&mut order);
            // Record the transaction id so the next check resolves to AlreadyProcessed instead of
            // crediting the same overpayment again.
            order.txid = Some(txid.clone());
            order.checked = true;
            let asset = &ctx.expected_asset;
            let audit_note =
                format!("(Binance Pay) Overpaid {excess} {asset} (>={}). Order remains On-Hold.", ctx.match_threshold);
            OrderOutcome {
                outcome: CheckOutcome {
                    done: false,
                    status: order.status,
                    lock: false,
                    message: format!("Overpaid {excess} {asset}. Order remains On-Hold."),
                },
                order,
                mutated: true,
                audit_note: Some(audit_note),
            }
        },
        Verdict::NoMatch => OrderOutcome {
            outcome: CheckOutcome {
                done: false,
                status: order.status,
                lock: false,
                message: format!(
                    "No matching Binance Pay receipt found in the last {} day(s). Please check \
                     asset/memo/amount/account.",
                    ctx.lookback_days
                ),
            },
            order,
            mutated: false,
            audit_note: None,
        },
    }
}
