mod asset_amount;
mod secret;

pub use asset_amount::{AssetAmount, AssetAmountConversionError, DEFAULT_ASSET, SUPPORTED_ASSETS};
pub use secret::Secret;

/// Compare two strings in constant time with respect to their contents.
///
/// Used for order keys and admin tokens, where a naive comparison would leak the position of the
/// first mismatching byte. Length differences still short-circuit.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq("wc_order_AbC123", "wc_order_AbC123"));
        assert!(!constant_time_eq("wc_order_AbC123", "wc_order_AbC124"));
        assert!(!constant_time_eq("short", "longer string"));
        assert!(constant_time_eq("", ""));
    }
}
