use std::{sync::Arc, time::Duration};

use chrono::Utc;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;

use crate::{config::BinanceConfig, data_objects::PayHistoryEnvelope, error::BinanceApiError, signing::signed_query};

/// A single, un-normalized payment-history record as returned by the API.
pub type RawTransaction = Value;

const PAY_TRANSACTIONS_PATH: &str = "/sapi/v1/pay/transactions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct BinancePayApi {
    config: BinanceConfig,
    client: Arc<Client>,
}

impl BinancePayApi {
    pub fn new(config: BinanceConfig) -> Result<Self, BinanceApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| BinanceApiError::Initialization(e.to_string()))?;
        headers.insert("X-MBX-APIKEY", val);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BinanceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// True when both API credentials are present.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Fetch a page of pay-transaction records.
    ///
    /// `window` is an optional inclusive `(start, end)` pair in epoch milliseconds. When absent,
    /// the API returns its most recent records regardless of age; callers use this as a fallback
    /// for transaction subtypes that never populate their timestamp field.
    ///
    /// An explicit rejection envelope maps to [`BinanceApiError::Remote`]. A response that matches
    /// none of the known shapes, but carries no failure flag either, is treated as an empty page.
    pub async fn pay_transactions(
        &self,
        window: Option<(i64, i64)>,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<Vec<RawTransaction>, BinanceApiError> {
        let timestamp = Utc::now().timestamp_millis();
        let mut params = vec![("timestamp", timestamp.to_string()), ("limit", limit.to_string())];
        if let Some((start, end)) = window {
            params.push(("startTime", start.to_string()));
            params.push(("endTime", end.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        let query = signed_query(&params, self.config.api_secret.reveal());
        let url = format!("{}{PAY_TRANSACTIONS_PATH}?{query}", self.config.base_url);
        trace!("Fetching pay transactions (window: {window:?}, limit: {limit})");
        let response = self.client.get(url).send().await.map_err(|e| BinanceApiError::Transport(e.to_string()))?;
        let body = response.json::<Value>().await.map_err(|e| BinanceApiError::JsonError(e.to_string()))?;
        match PayHistoryEnvelope::from_value(body) {
            PayHistoryEnvelope::DataList(records)
            | PayHistoryEnvelope::List(records)
            | PayHistoryEnvelope::Data(records) => {
                debug!("Fetched {} pay transaction record(s)", records.len());
                Ok(records)
            },
            PayHistoryEnvelope::Rejected(raw) => {
                warn!("Pay transactions request was rejected by the API: {raw}");
                Err(BinanceApiError::Remote(raw.to_string()))
            },
            PayHistoryEnvelope::Unrecognized(raw) => {
                debug!("Unrecognized pay transactions envelope, treating as empty: {raw}");
                Ok(Vec::new())
            },
        }
    }
}
