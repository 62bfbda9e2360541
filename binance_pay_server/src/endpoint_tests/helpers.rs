use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use bpg_common::Secret;
use log::debug;

use crate::config::ServerConfig;

pub const TEST_NONCE_SECRET: &str = "test-nonce-secret";
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

// Creates a test `ServerConfig` with fixed secrets. DO NOT re-use these anywhere.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::new("127.0.0.1", 0);
    config.nonce_secret = Secret::new(TEST_NONCE_SECRET.to_string());
    config.admin_token = Secret::new(TEST_ADMIN_TOKEN.to_string());
    config
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn get_request(
    admin_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if !admin_header.is_empty() {
        req = req.insert_header(("X-BPG-Admin-Token", admin_header));
    }
    let req = req.to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
