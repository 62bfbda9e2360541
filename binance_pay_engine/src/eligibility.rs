//! Candidate selection: decides whether a canonical record could be the payment for one order.
//!
//! Direction and status checks are relaxed for peer-to-peer transfers because that subtype does
//! not reliably populate those fields; such records are trusted on memo and amount alone. The memo
//! equality check is the primary anti-fraud control, since amounts can collide across unrelated
//! orders.

use crate::{context::OrderPaymentContext, normalize::CanonicalTransaction};

/// Inbound/receive direction codes accepted for non-peer-to-peer records.
pub const ALLOWED_DIRECTIONS: [&str; 5] = ["RECEIVE", "IN", "INCOMING", "PAYMENT_RECEIVED", "COLLECT"];
/// Settlement-success status codes accepted for non-peer-to-peer records.
pub const ALLOWED_STATUSES: [&str; 5] = ["SUCCESS", "COMPLETED", "PAID", "PAID_SUCCESS", "SUCCESSFUL"];

fn in_allow_list(value: &str, list: &[&str]) -> bool {
    list.iter().any(|allowed| value.eq_ignore_ascii_case(allowed))
}

/// Pure predicate over `(tx, ctx)`. Rules apply in order and short-circuit on the first failure:
/// direction, status, currency, time window, memo.
pub fn is_eligible(tx: &CanonicalTransaction, ctx: &OrderPaymentContext) -> bool {
    let p2p = tx.is_peer_to_peer();
    if !p2p && !in_allow_list(&tx.direction, &ALLOWED_DIRECTIONS) {
        return false;
    }
    if !p2p && !in_allow_list(&tx.status, &ALLOWED_STATUSES) {
        return false;
    }
    if tx.currency != ctx.expected_asset {
        return false;
    }
    // Zero-timestamp and peer-to-peer records skip the window check entirely.
    if !p2p && tx.timestamp_ms != 0 && (tx.timestamp_ms < ctx.window_start_ms || tx.timestamp_ms > ctx.window_end_ms) {
        return false;
    }
    let note = tx.note.trim();
    !note.is_empty() && note.eq_ignore_ascii_case(ctx.expected_memo.trim())
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::{normalize::normalize, test_utils::sample_order};

    fn ctx() -> OrderPaymentContext {
        OrderPaymentContext::for_order(&sample_order(), Utc::now(), 1).unwrap()
    }

    fn in_window(ctx: &OrderPaymentContext) -> i64 {
        (ctx.window_start_ms + ctx.window_end_ms) / 2
    }

    #[test]
    fn matching_receive_record_is_eligible() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT",
            "note": "abcd1234efgh", "totalAmount": 10.0, "transactionTime": in_window(&ctx),
        }));
        assert!(is_eligible(&tx, &ctx));
    }

    #[test]
    fn direction_and_status_lists_are_case_insensitive() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "collect", "status": "Paid_Success", "currency": "USDT",
            "note": "ABCD1234EFGH", "transactionTime": in_window(&ctx),
        }));
        assert!(is_eligible(&tx, &ctx));
    }

    #[test]
    fn outbound_or_unsettled_records_are_rejected() {
        let ctx = ctx();
        let base = json!({
            "currency": "USDT", "note": "ABCD1234EFGH", "transactionTime": in_window(&ctx),
        });
        let mut send = base.clone();
        send["type"] = "SEND".into();
        send["status"] = "SUCCESS".into();
        assert!(!is_eligible(&normalize(&send), &ctx));

        let mut pending = base;
        pending["type"] = "RECEIVE".into();
        pending["status"] = "PENDING".into();
        assert!(!is_eligible(&normalize(&pending), &ctx));
    }

    #[test]
    fn wrong_asset_is_rejected() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDC",
            "note": "ABCD1234EFGH", "transactionTime": in_window(&ctx),
        }));
        assert!(!is_eligible(&tx, &ctx));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let ctx = ctx();
        let record = |ts: i64| {
            normalize(&json!({
                "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT",
                "note": "ABCD1234EFGH", "transactionTime": ts,
            }))
        };
        assert!(is_eligible(&record(ctx.window_start_ms), &ctx));
        assert!(is_eligible(&record(ctx.window_end_ms), &ctx));
        assert!(!is_eligible(&record(ctx.window_start_ms - 1), &ctx));
        assert!(!is_eligible(&record(ctx.window_end_ms + 1), &ctx));
    }

    #[test]
    fn zero_timestamp_skips_the_window_check() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT", "note": "ABCD1234EFGH",
        }));
        assert_eq!(tx.timestamp_ms, 0);
        assert!(is_eligible(&tx, &ctx));
    }

    #[test]
    fn memo_comparison_is_trimmed_and_case_insensitive() {
        let mut order = sample_order();
        order.memo = "ABC123".to_string();
        let ctx = OrderPaymentContext::for_order(&order, Utc::now(), 1).unwrap();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT", "note": " abc123 ",
        }));
        assert!(is_eligible(&tx, &ctx));
    }

    #[test]
    fn empty_note_always_rejects() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT", "note": "   ",
            "transactionTime": in_window(&ctx),
        }));
        assert!(!is_eligible(&tx, &ctx));
    }

    #[test]
    fn peer_to_peer_bypasses_direction_status_and_window() {
        let ctx = ctx();
        // No direction, no status, no timestamp: still eligible on currency + memo alone.
        let tx = normalize(&json!({
            "orderType": "C2C", "currency": "USDT", "note": "abcd1234efgh",
        }));
        assert!(is_eligible(&tx, &ctx));

        // But currency and memo still bind.
        let wrong_asset = normalize(&json!({"orderType": "C2C", "currency": "USDC", "note": "ABCD1234EFGH"}));
        assert!(!is_eligible(&wrong_asset, &ctx));
        let wrong_memo = normalize(&json!({"orderType": "C2C", "currency": "USDT", "note": "other"}));
        assert!(!is_eligible(&wrong_memo, &ctx));
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let ctx = ctx();
        let tx = normalize(&json!({
            "type": "RECEIVE", "status": "SUCCESS", "currency": "USDT",
            "note": "ABCD1234EFGH", "transactionTime": in_window(&ctx),
        }));
        let first = is_eligible(&tx, &ctx);
        for _ in 0..10 {
            assert_eq!(is_eligible(&tx, &ctx), first);
        }
    }
}
