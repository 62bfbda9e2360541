//! Anti-forgery tokens and admin gating.
//!
//! The storefront receives a per-order check token when the payment page renders. A check request
//! must echo that token back; it proves the request originated from a page this server rendered
//! for that order, not from a blind POST. Tokens are an HMAC over the order id, so they need no
//! storage and remain valid as long as the nonce secret is stable.

use binance_pay_engine::db_types::OrderId;
use binance_tools::hmac_sha256_hex;
use bpg_common::{constant_time_eq, Secret};

/// Mint the check token for an order.
pub fn check_token(nonce_secret: &Secret<String>, order_id: &OrderId) -> String {
    hmac_sha256_hex(nonce_secret.reveal(), order_id.as_str())
}

/// Validate a token presented by the storefront. Constant-time.
pub fn validate_check_token(token: &str, nonce_secret: &Secret<String>, order_id: &OrderId) -> bool {
    constant_time_eq(token, &check_token(nonce_secret, order_id))
}

/// Constant-time admin-token check. An empty configured token refuses everyone.
pub fn is_admin(provided: Option<&str>, admin_token: &Secret<String>) -> bool {
    match provided {
        Some(token) if !admin_token.is_empty() => constant_time_eq(token, admin_token.reveal()),
        _ => false,
    }
}
