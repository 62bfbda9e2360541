use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

use crate::db_types::OrderId;

/// Length of a generated payment memo.
pub const MEMO_LENGTH: usize = 12;

/// Generate the per-order payment memo the payer must attach to their transfer.
///
/// The memo is the uppercase prefix of a SHA-256 over the order key, order id, a random component
/// and the current time. It only needs to be unguessable-enough and unique-enough to act as the
/// correlation key between a transfer and one order; it is not a secret after checkout, since it
/// is displayed to the payer.
pub fn generate_memo(order_key: &str, order_id: &OrderId) -> String {
    let noise: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    let seed = format!("{order_key}|{}|{noise}|{}", order_id.as_str(), Utc::now().timestamp_micros());
    let digest = Sha256::digest(seed.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..MEMO_LENGTH].to_uppercase()
}
