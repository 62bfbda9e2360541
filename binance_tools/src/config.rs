use bpg_common::Secret;
use log::*;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL for the Binance API, without a trailing slash.
    pub base_url: String,
    pub api_key: Secret<String>,
    pub api_secret: Secret<String>,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), api_key: Secret::default(), api_secret: Secret::default() }
    }
}

impl BinanceConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BPG_BINANCE_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| {
                info!("BPG_BINANCE_BASE_URL not set, using {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            });
        let api_key = Secret::new(std::env::var("BPG_BINANCE_API_KEY").unwrap_or_else(|_| {
            warn!("BPG_BINANCE_API_KEY is not set. Payment checks will fail until it is configured.");
            String::default()
        }));
        let api_secret = Secret::new(std::env::var("BPG_BINANCE_API_SECRET").unwrap_or_else(|_| {
            warn!("BPG_BINANCE_API_SECRET is not set. Payment checks will fail until it is configured.");
            String::default()
        }));
        Self { base_url, api_key, api_secret }
    }

    /// True when both the API key and secret have been supplied. Checks must not be attempted
    /// against an unconfigured client.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
