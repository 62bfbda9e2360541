//! Request signing for the Binance REST API.
//!
//! Binance signs GET requests with an HMAC-SHA256 over the query string. The query string must be
//! canonical: parameters sorted lexicographically by key and percent-encoded, with the resulting
//! hex digest appended as a final `signature` parameter. The API key is never part of the query;
//! it travels in the `X-MBX-APIKEY` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Percent-encode a single query component. Unreserved characters (RFC 3986) pass through.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Build the canonical query string: keys sorted lexicographically, each pair encoded as
/// `key=value`, joined with `&`.
pub fn canonical_query(params: &[(&str, String)]) -> String {
    let mut pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Lowercase hex HMAC-SHA256 digest of `payload` under `secret`.
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    // HMAC accepts keys of any length, so new_from_slice cannot fail here.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().iter().map(|b| format!("{b:02x}")).collect()
}

/// Canonicalize `params` and append the signature, yielding the final query string to send.
pub fn signed_query(params: &[(&str, String)], secret: &str) -> String {
    let query = canonical_query(params);
    let signature = hmac_sha256_hex(secret, &query);
    format!("{query}&signature={signature}")
}
