use actix_web::{web, web::ServiceConfig};
use binance_pay_engine::{db_types::OrderId, test_utils::sample_order, CheckConfig, PaymentCheckApi};
use bpg_common::Secret;
use serde_json::{json, Value};

use super::{
    helpers::{post_request, test_config, TEST_NONCE_SECRET},
    mocks::{MockSource, MockStore},
};
use crate::{auth::check_token, routes::CheckRoute};

fn token_for(order_id: &str) -> String {
    check_token(&Secret::new(TEST_NONCE_SECRET.to_string()), &OrderId(order_id.to_string()))
}

fn body(v: &str) -> Value {
    serde_json::from_str(v).expect("Response body was not valid JSON")
}

#[actix_web::test]
async fn rejects_requests_without_a_valid_token() {
    let _ = env_logger::try_init().ok();
    let payload = json!({"order_id": "1001", "order_key": "wc_order_key_1001", "token": "bogus"});
    let (status, res) = post_request("/check", payload, configure_untouched).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(false));
    assert_eq!(res["data"]["message"], json!("Security check failed. Please refresh the page."));
}

#[actix_web::test]
async fn unknown_orders_fail_in_the_body_not_the_status() {
    let payload = json!({"order_id": "9999", "order_key": "whatever", "token": token_for("9999")});
    let (status, res) = post_request("/check", payload, configure_no_order).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(false));
    assert_eq!(res["data"]["message"], json!("Order #9999 not found."));
}

#[actix_web::test]
async fn settled_orders_short_circuit_to_already_processed() {
    let payload = json!({"order_id": "1001", "order_key": "wc_order_key_1001", "token": token_for("1001")});
    let (status, res) = post_request("/check", payload, configure_paid_order).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"]["done"], json!(true));
    assert_eq!(res["data"]["lock"], json!(true));
    assert_eq!(res["data"]["message"], json!("Order already processed."));
}

#[actix_web::test]
async fn wrong_order_key_is_rejected() {
    let payload = json!({"order_id": "1001", "order_key": "not-the-key", "token": token_for("1001")});
    let (status, res) = post_request("/check", payload, configure_paid_order).await.unwrap();
    assert!(status.is_success());
    let res = body(&res);
    assert_eq!(res["success"], json!(false));
    assert_eq!(res["data"]["message"], json!("You are not allowed to access this order."));
}

/// No mock expectations at all: a bad token must never reach the store or the payment API.
fn configure_untouched(cfg: &mut ServiceConfig) {
    let api = PaymentCheckApi::new(MockStore::new(), MockSource::new(), CheckConfig::default());
    cfg.service(CheckRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_no_order(cfg: &mut ServiceConfig) {
    let mut store = MockStore::new();
    store.expect_fetch_order_by_order_id().returning(|_| Ok(None));
    let api = PaymentCheckApi::new(store, MockSource::new(), CheckConfig::default());
    cfg.service(CheckRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_paid_order(cfg: &mut ServiceConfig) {
    let mut store = MockStore::new();
    store.expect_fetch_order_by_order_id().returning(|_| {
        let mut order = sample_order();
        order.status = binance_pay_engine::db_types::OrderStatusType::Processing;
        order.locked = true;
        Ok(Some(order))
    });
    // A settled order answers without the payment client being consulted at all.
    let api = PaymentCheckApi::new(store, MockSource::new(), CheckConfig::default());
    cfg.service(CheckRoute::<MockStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}
