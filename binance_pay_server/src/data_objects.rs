use actix_web::HttpResponse;
use binance_pay_engine::db_types::OrderId;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of a storefront check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub order_id: OrderId,
    /// The order's secret key, authorizing the caller to query this order.
    #[serde(default)]
    pub order_key: Option<String>,
    /// The anti-forgery token handed to the payment page at render time.
    #[serde(default)]
    pub token: Option<String>,
}

/// The storefront response envelope: always HTTP 200, with success or failure in the body so the
/// page's polling script has a single code path.
pub struct JsonResponse;

impl JsonResponse {
    pub fn success<T: Serialize>(data: T) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "success": true, "data": data }))
    }

    pub fn failure(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "success": false, "data": { "message": message } }))
    }
}
