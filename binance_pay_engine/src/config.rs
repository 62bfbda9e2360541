use log::*;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 1;
pub const DEFAULT_WINDOWED_FETCH_LIMIT: usize = 200;
pub const DEFAULT_FALLBACK_FETCH_LIMIT: usize = 100;

/// Tunables for the check pipeline. Formerly global constants in the original gateway; passed in
/// explicitly so tests and deployments can vary them.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// How far back the windowed fetch looks, in whole days. Default 1.
    pub lookback_days: i64,
    /// Record limit for the windowed (normal polling) fetch. Default 200.
    pub windowed_fetch_limit: usize,
    /// Record limit for the unwindowed fallback fetch that covers zero-timestamp transaction
    /// subtypes. Default 100.
    pub fallback_fetch_limit: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            windowed_fetch_limit: DEFAULT_WINDOWED_FETCH_LIMIT,
            fallback_fetch_limit: DEFAULT_FALLBACK_FETCH_LIMIT,
        }
    }
}

impl CheckConfig {
    pub fn from_env_or_default() -> Self {
        let lookback_days = std::env::var("BPG_LOOKBACK_DAYS")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("Invalid BPG_LOOKBACK_DAYS ({s}): {e}. Using {DEFAULT_LOOKBACK_DAYS}."))
                    .ok()
            })
            .filter(|days| {
                let positive = *days > 0;
                if !positive {
                    warn!("BPG_LOOKBACK_DAYS must be positive. Using {DEFAULT_LOOKBACK_DAYS}.");
                }
                positive
            })
            .unwrap_or(DEFAULT_LOOKBACK_DAYS);
        Self { lookback_days, ..Default::default() }
    }
}
