use actix_web::{http::StatusCode, web, web::ServiceConfig};
use binance_pay_engine::{CheckConfig, PaymentCheckApi};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, test_config, TEST_ADMIN_TOKEN},
    mocks::{MockSource, MockStore},
};
use crate::routes::LatestTransactionRoute;

const PATH: &str = "/debug/latest-transaction";

fn body(v: &str) -> Value {
    serde_json::from_str(v).expect("Response body was not valid JSON")
}

#[actix_web::test]
async fn refuses_callers_without_the_admin_token() {
    let _ = env_logger::try_init().ok();
    let (status, res) = get_request("", PATH, configure_with_record).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body(&res)["error"], json!("Admin token missing or invalid."));

    let (status, _) = get_request("wrong-token", PATH, configure_with_record).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn returns_the_latest_normalized_record() {
    let (status, res) = get_request(TEST_ADMIN_TOKEN, PATH, configure_with_record).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"]["message"], json!("Latest Binance Pay record returned (fields normalized)."));
    assert_eq!(res["data"]["record"]["txid"], json!("newest"));
    assert_eq!(res["data"]["record"]["amount"], json!(2_500_000));
}

#[actix_web::test]
async fn reports_when_the_account_has_no_records() {
    let (status, res) = get_request(TEST_ADMIN_TOKEN, PATH, configure_empty).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(false));
    assert_eq!(
        res["data"]["message"],
        json!("No records found. Check API base domain/permissions/account match with the QR code.")
    );
}

#[actix_web::test]
async fn missing_credentials_are_a_server_error() {
    let (status, _) = get_request(TEST_ADMIN_TOKEN, PATH, configure_unconfigured).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

fn configure_with_record(cfg: &mut ServiceConfig) {
    let mut source = MockSource::new();
    source.expect_is_configured().return_const(true);
    source.expect_fetch_transactions().returning(|_, _| {
        Ok(vec![
            json!({"transactionId": "older", "transactionTime": 100, "totalAmount": 1.0}),
            json!({"transactionId": "newest", "transactionTime": 300, "totalAmount": 2.5}),
        ])
    });
    let api = PaymentCheckApi::new(MockStore::new(), source, CheckConfig::default());
    cfg.service(LatestTransactionRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_empty(cfg: &mut ServiceConfig) {
    let mut source = MockSource::new();
    source.expect_is_configured().return_const(true);
    source.expect_fetch_transactions().returning(|_, _| Ok(Vec::new()));
    let api = PaymentCheckApi::new(MockStore::new(), source, CheckConfig::default());
    cfg.service(LatestTransactionRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_unconfigured(cfg: &mut ServiceConfig) {
    let mut source = MockSource::new();
    source.expect_is_configured().return_const(false);
    let api = PaymentCheckApi::new(MockStore::new(), source, CheckConfig::default());
    cfg.service(LatestTransactionRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}
