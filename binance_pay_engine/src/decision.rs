//! The reconciliation decision engine.
//!
//! Candidates are scanned once, in the order the fetcher returned them, and the first candidate
//! encountered decides the verdict. The engine deliberately does not collect all candidates and
//! prefer an exact match: when a window holds both an underpaid and a correctly-paid transfer,
//! whichever the API returned first wins. Changing this would change observable behaviour.

use bpg_common::AssetAmount;
use log::debug;

use crate::{context::OrderPaymentContext, db_types::Order, normalize::CanonicalTransaction};

/// The settlement verdict for one check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// A candidate's transaction id equals the order's stored last-matched id. Idempotent no-op,
    /// except that the projector re-affirms the settled state if a manual rollback undid it.
    AlreadyProcessed { txid: String },
    /// A candidate's amount lies strictly within the match threshold of the expected amount.
    Settled { txid: String, amount: AssetAmount },
    /// Short by at least the threshold.
    Underpaid { shortfall: AssetAmount, txid: Option<String> },
    /// Over by at least the threshold.
    Overpaid { excess: AssetAmount, txid: String },
    /// No eligible candidate.
    NoMatch,
}

/// Classify the first candidate against the expected amount; [`Verdict::NoMatch`] when the
/// candidate list is empty.
pub fn decide(order: &Order, candidates: &[CanonicalTransaction], ctx: &OrderPaymentContext) -> Verdict {
    for tx in candidates {
        if !tx.txid.is_empty() && order.txid.as_deref() == Some(tx.txid.as_str()) {
            debug!("Order {} already matched transaction {}", order.order_id, tx.txid);
            return Verdict::AlreadyProcessed { txid: tx.txid.clone() };
        }
        let diff = tx.amount - ctx.expected_amount;
        let verdict = if diff.abs() < ctx.match_threshold {
            Verdict::Settled { txid: tx.txid.clone(), amount: tx.amount }
        } else if diff < AssetAmount::default() {
            Verdict::Underpaid { shortfall: diff.abs(), txid: (!tx.txid.is_empty()).then(|| tx.txid.clone()) }
        } else {
            Verdict::Overpaid { excess: diff, txid: tx.txid.clone() }
        };
        debug!("Order {} verdict: {verdict:?}", order.order_id);
        return verdict;
    }
    Verdict::NoMatch
}
