//! Canonicalization of raw payment-history records.
//!
//! The payment API has shipped the same logical fields under several names over time, and some
//! transaction subtypes omit fields entirely. Rather than ad hoc existence checks, each canonical
//! field has a fixed alias precedence table, and [`normalize`] is total: missing or malformed
//! fields coerce to an empty string or zero so that every downstream comparison is a total
//! function.

use bpg_common::AssetAmount;
use serde::Serialize;
use serde_json::Value;

/// Order-type marker for peer-to-peer transfers, whose direction/status/timestamp fields are
/// unreliable and get relaxed eligibility rules.
pub const PEER_TO_PEER_ORDER_TYPE: &str = "C2C";

// Alias precedence tables, most-preferred first.
pub const DIRECTION_ALIASES: [&str; 2] = ["type", "transactType"];
pub const CURRENCY_ALIASES: [&str; 2] = ["currency", "asset"];
pub const NOTE_ALIASES: [&str; 3] = ["note", "remark", "comment"];
pub const AMOUNT_ALIASES: [&str; 2] = ["totalAmount", "amount"];
pub const TIMESTAMP_ALIASES: [&str; 3] = ["transactionTime", "transactedAt", "time"];
pub const TXID_ALIASES: [&str; 2] = ["transactionId", "bizId"];

/// One payment-history record in canonical shape. Every field is populated; defaults stand in for
/// anything the raw record did not carry.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalTransaction {
    pub order_type: String,
    /// Raw transaction-type/direction code, e.g. `RECEIVE`.
    pub direction: String,
    /// Raw settlement-status code, e.g. `SUCCESS`.
    pub status: String,
    /// Uppercase, trimmed asset symbol.
    pub currency: String,
    /// Free-text memo/remark/comment, first non-empty alias.
    pub note: String,
    pub amount: AssetAmount,
    /// Epoch milliseconds; 0 when the record carries no usable timestamp.
    pub timestamp_ms: i64,
    /// Transaction id; empty when absent.
    pub txid: String,
    /// The raw payload, retained for diagnostics.
    #[serde(skip_serializing)]
    pub raw: Value,
}

impl CanonicalTransaction {
    pub fn is_peer_to_peer(&self) -> bool {
        self.order_type.eq_ignore_ascii_case(PEER_TO_PEER_ORDER_TYPE)
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// First alias present in the record, coerced to a string.
fn string_field(raw: &Value, aliases: &[&str]) -> String {
    aliases.iter().find_map(|key| raw.get(key)).map(coerce_string).unwrap_or_default()
}

/// First alias present in the record with a non-empty string value.
fn non_empty_string_field(raw: &Value, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|key| raw.get(key))
        .map(coerce_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn amount_field(raw: &Value, aliases: &[&str]) -> AssetAmount {
    aliases
        .iter()
        .find_map(|key| raw.get(key))
        .and_then(coerce_f64)
        .map(AssetAmount::from_f64)
        .unwrap_or_default()
}

fn millis_field(raw: &Value, aliases: &[&str]) -> i64 {
    aliases
        .iter()
        .find_map(|key| raw.get(key))
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(0)
}

/// Map a raw record into canonical shape. Pure and total: never fails, whatever the input.
pub fn normalize(raw: &Value) -> CanonicalTransaction {
    CanonicalTransaction {
        order_type: string_field(raw, &["orderType"]),
        direction: string_field(raw, &DIRECTION_ALIASES),
        status: string_field(raw, &["status"]),
        currency: string_field(raw, &CURRENCY_ALIASES).trim().to_uppercase(),
        note: non_empty_string_field(raw, &NOTE_ALIASES),
        amount: amount_field(raw, &AMOUNT_ALIASES),
        timestamp_ms: millis_field(raw, &TIMESTAMP_ALIASES),
        txid: string_field(raw, &TXID_ALIASES),
        raw: raw.clone(),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let tx = normalize(&json!({}));
        assert_eq!(tx.order_type, "");
        assert_eq!(tx.direction, "");
        assert_eq!(tx.status, "");
        assert_eq!(tx.currency, "");
        assert_eq!(tx.note, "");
        assert_eq!(tx.amount, AssetAmount::default());
        assert_eq!(tx.timestamp_ms, 0);
        assert_eq!(tx.txid, "");
    }

    #[test]
    fn malformed_values_yield_defaults() {
        let tx = normalize(&json!({
            "totalAmount": {"nested": true},
            "transactionTime": [1, 2, 3],
            "note": null,
            "currency": 42,
        }));
        assert_eq!(tx.amount, AssetAmount::default());
        assert_eq!(tx.timestamp_ms, 0);
        assert_eq!(tx.note, "");
        assert_eq!(tx.currency, "42");
    }

    #[test]
    fn amount_prefers_total_amount() {
        let tx = normalize(&json!({"totalAmount": "10.5", "amount": 3.2}));
        assert_eq!(tx.amount, AssetAmount::from_f64(10.5));
        let tx = normalize(&json!({"amount": 3.2}));
        assert_eq!(tx.amount, AssetAmount::from_f64(3.2));
    }

    #[test]
    fn timestamp_precedence() {
        let tx = normalize(&json!({"transactionTime": 100, "transactedAt": 200, "time": 300}));
        assert_eq!(tx.timestamp_ms, 100);
        let tx = normalize(&json!({"transactedAt": "200", "time": 300}));
        assert_eq!(tx.timestamp_ms, 200);
        let tx = normalize(&json!({"time": 300}));
        assert_eq!(tx.timestamp_ms, 300);
    }

    #[test]
    fn note_takes_first_non_empty_alias() {
        let tx = normalize(&json!({"note": "", "remark": "ABCD1234"}));
        assert_eq!(tx.note, "ABCD1234");
        let tx = normalize(&json!({"comment": "fallback"}));
        assert_eq!(tx.note, "fallback");
    }

    #[test]
    fn currency_is_uppercased_and_trimmed() {
        let tx = normalize(&json!({"asset": " usdt "}));
        assert_eq!(tx.currency, "USDT");
        let tx = normalize(&json!({"currency": "usdc", "asset": "BTC"}));
        assert_eq!(tx.currency, "USDC");
    }

    #[test]
    fn txid_falls_back_to_biz_id() {
        let tx = normalize(&json!({"bizId": 998877}));
        assert_eq!(tx.txid, "998877");
        let tx = normalize(&json!({"transactionId": "tx-1", "bizId": "b-2"}));
        assert_eq!(tx.txid, "tx-1");
    }

    #[test]
    fn peer_to_peer_detection() {
        assert!(normalize(&json!({"orderType": "C2C"})).is_peer_to_peer());
        assert!(normalize(&json!({"orderType": "c2c"})).is_peer_to_peer());
        assert!(!normalize(&json!({"orderType": ""})).is_peer_to_peer());
    }
}
