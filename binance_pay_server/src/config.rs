use std::env;

use binance_pay_engine::CheckConfig;
use binance_tools::BinanceConfig;
use bpg_common::Secret;
use log::*;
use rand::{distributions::Alphanumeric, Rng};

const DEFAULT_BPG_HOST: &str = "127.0.0.1";
const DEFAULT_BPG_PORT: u16 = 8380;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Tunables for the reconciliation pipeline (lookback window, fetch limits).
    pub check: CheckConfig,
    /// Credentials and base URL for the payment-history API.
    pub binance: BinanceConfig,
    /// Secret used to mint and validate the storefront anti-forgery tokens.
    pub nonce_secret: Secret<String>,
    /// Token guarding the `/debug` routes. When empty, those routes refuse all callers.
    pub admin_token: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BPG_HOST.to_string(),
            port: DEFAULT_BPG_PORT,
            database_url: String::default(),
            check: CheckConfig::default(),
            binance: BinanceConfig::default(),
            nonce_secret: Secret::default(),
            admin_token: Secret::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BPG_HOST").ok().unwrap_or_else(|| DEFAULT_BPG_HOST.into());
        let port = env::var("BPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("{s} is not a valid port for BPG_PORT. {e} Using the default, {DEFAULT_BPG_PORT}, instead.");
                    DEFAULT_BPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BPG_PORT);
        let database_url = env::var("BPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("BPG_DATABASE_URL is not set. Please set it to the URL for the gateway database.");
            String::default()
        });
        let nonce_secret = env::var("BPG_NONCE_SECRET").map(Secret::new).unwrap_or_else(|_| {
            warn!(
                "BPG_NONCE_SECRET is not set. A random secret will be used for this run, so storefront check tokens \
                 will not survive a server restart."
            );
            Secret::new(random_secret())
        });
        let admin_token = env::var("BPG_ADMIN_TOKEN").map(Secret::new).unwrap_or_else(|_| {
            warn!("BPG_ADMIN_TOKEN is not set. The /debug routes will refuse all requests.");
            Secret::default()
        });
        Self {
            host,
            port,
            database_url,
            check: CheckConfig::from_env_or_default(),
            binance: BinanceConfig::new_from_env_or_default(),
            nonce_secret,
            admin_token,
        }
    }
}

fn random_secret() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}
