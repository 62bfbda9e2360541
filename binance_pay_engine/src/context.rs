use bpg_common::{AssetAmount, DEFAULT_ASSET};
use chrono::{DateTime, Duration, Utc};

use crate::{db_types::Order, errors::PaymentCheckError};

/// Absolute amount tolerance for an "exact" match. A diff strictly below this settles the order;
/// a diff of exactly the threshold classifies as under/overpaid.
pub const MATCH_THRESHOLD: AssetAmount = AssetAmount::from_micro(500_000);

/// Everything the filter and decision engine need to know about one order, derived once per check
/// and read-only for its duration.
#[derive(Debug, Clone)]
pub struct OrderPaymentContext {
    /// Trimmed, case-preserved memo the payer was instructed to use.
    pub expected_memo: String,
    /// Uppercase asset symbol.
    pub expected_asset: String,
    /// Strictly positive expected amount. Zero or negative is a configuration error.
    pub expected_amount: AssetAmount,
    pub window_start_ms: i64,
    pub window_end_ms: i64,
    /// The configured lookback, kept for operator-facing messages.
    pub lookback_days: i64,
    pub match_threshold: AssetAmount,
}

impl OrderPaymentContext {
    /// Derive the context for a check of `order` happening at `now`, looking back `lookback_days`.
    ///
    /// Fails with a configuration error when the order is missing its memo or a positive expected
    /// amount; these are operator/setup mistakes, not retryable conditions.
    pub fn for_order(order: &Order, now: DateTime<Utc>, lookback_days: i64) -> Result<Self, PaymentCheckError> {
        let expected_memo = order.memo.trim().to_string();
        if expected_memo.is_empty() || order.amount.value() <= 0 {
            return Err(PaymentCheckError::Config(
                "Order is missing payment match info (memo or amount).".to_string(),
            ));
        }
        let expected_asset = match order.asset.trim() {
            "" => DEFAULT_ASSET.to_string(),
            asset => asset.to_uppercase(),
        };
        let window_end_ms = now.timestamp_millis();
        let window_start_ms = window_end_ms - Duration::days(lookback_days).num_milliseconds();
        Ok(Self {
            expected_memo,
            expected_asset,
            expected_amount: order.amount,
            window_start_ms,
            window_end_ms,
            lookback_days,
            match_threshold: MATCH_THRESHOLD,
        })
    }
}

#[cfg(test)]
mod test {
    use bpg_common::AssetAmount;
    use chrono::Utc;

    use super::*;
    use crate::test_utils::sample_order;

    #[test]
    fn context_for_valid_order() {
        let now = Utc::now();
        let ctx = OrderPaymentContext::for_order(&sample_order(), now, 1).unwrap();
        assert_eq!(ctx.expected_memo, "ABCD1234EFGH");
        assert_eq!(ctx.expected_asset, "USDT");
        assert_eq!(ctx.expected_amount, AssetAmount::from_units(10));
        assert_eq!(ctx.window_end_ms, now.timestamp_millis());
        assert_eq!(ctx.window_end_ms - ctx.window_start_ms, 86_400_000);
        assert_eq!(ctx.match_threshold, AssetAmount::from_f64(0.5));
    }

    #[test]
    fn memo_is_trimmed_and_asset_defaulted() {
        let mut order = sample_order();
        order.memo = "  abCD12  ".to_string();
        order.asset = " ".to_string();
        let ctx = OrderPaymentContext::for_order(&order, Utc::now(), 1).unwrap();
        assert_eq!(ctx.expected_memo, "abCD12");
        assert_eq!(ctx.expected_asset, "USDT");
    }

    #[test]
    fn missing_memo_or_amount_is_a_config_error() {
        let mut order = sample_order();
        order.memo = "   ".to_string();
        assert!(matches!(
            OrderPaymentContext::for_order(&order, Utc::now(), 1),
            Err(PaymentCheckError::Config(_))
        ));

        let mut order = sample_order();
        order.amount = AssetAmount::default();
        assert!(matches!(
            OrderPaymentContext::for_order(&order, Utc::now(), 1),
            Err(PaymentCheckError::Config(_))
        ));
    }
}
