use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinanceApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Transport error calling the payment API: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The payment API rejected the request: {0}")]
    Remote(String),
}
