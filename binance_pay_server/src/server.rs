use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use binance_pay_engine::{CheckConfig, PaymentCheckApi, SqliteOrderStore};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::BinanceSource,
    routes::{health, CheckRoute, LatestTransactionRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = SqliteOrderStore::new(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let source = BinanceSource::new(config.binance.clone())?;
    let srv = create_server_instance(config, store, source)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    store: SqliteOrderStore,
    source: BinanceSource,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = PaymentCheckApi::new(store.clone(), source.clone(), config.check.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bpg::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(CheckRoute::<SqliteOrderStore, BinanceSource>::new())
            .service(LatestTransactionRoute::<SqliteOrderStore, BinanceSource>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Ensure the check configuration is sane before binding. Currently only warns; the server can
/// start without API credentials, but every check will fail with a configuration error.
pub fn warn_on_incomplete_config(config: &ServerConfig) {
    if !config.binance.is_configured() {
        log::warn!("Binance API credentials are not configured. Payment checks will fail until they are set.");
    }
    if config.database_url.is_empty() {
        log::error!("No database URL is configured. The server will not be able to start.");
    }
    let CheckConfig { lookback_days, .. } = config.check;
    log::info!("Payment checks will look back {lookback_days} day(s)");
}
