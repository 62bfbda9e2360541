//! Adapts the Binance REST client to the engine's [`TransactionSource`] seam.
//!
//! Explicit rejection envelopes map to `Rejected`, which the check treats as zero records.
//! Everything else (network failures, unparseable bodies, client misconfiguration) maps to
//! `Transport` and aborts the check.

use binance_pay_engine::traits::{TransactionSource, TransactionSourceError};
use binance_tools::{BinanceApiError, BinanceConfig, BinancePayApi};
use serde_json::Value;

use crate::errors::ServerError;

#[derive(Clone)]
pub struct BinanceSource {
    api: BinancePayApi,
}

impl BinanceSource {
    pub fn new(config: BinanceConfig) -> Result<Self, ServerError> {
        let api = BinancePayApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

impl TransactionSource for BinanceSource {
    async fn fetch_transactions(
        &self,
        window: Option<(i64, i64)>,
        limit: usize,
    ) -> Result<Vec<Value>, TransactionSourceError> {
        self.api.pay_transactions(window, limit, None).await.map_err(|e| match e {
            BinanceApiError::Remote(msg) => TransactionSourceError::Rejected(msg),
            other => TransactionSourceError::Transport(other.to_string()),
        })
    }

    fn is_configured(&self) -> bool {
        self.api.is_configured()
    }
}
