//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into
//! a separate module. Keep this module neat and tidy 🙏
//!
//! Any long, non-cpu-bound operation (I/O, database calls, the payment API round-trip) must be
//! awaited rather than blocked on, so worker threads keep serving other requests.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use binance_pay_engine::{
    traits::{OrderStore, TransactionSource},
    CheckRequestAuth,
    PaymentCheckApi,
    PaymentCheckError,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{is_admin, validate_check_token},
    config::ServerConfig,
    data_objects::{CheckRequest, JsonResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Check  ----------------------------------------------------
route!(check => Post "/check" impl OrderStore, TransactionSource);
/// Route handler for the storefront "I have paid" check.
///
/// Always answers HTTP 200. The polling script on the payment page has one code path: it reads
/// `success` and `data.message` from the body, and stops polling when `data.done` is true.
///
/// The anti-forgery token is validated before any reconciliation work; a request without a valid
/// token never touches the database or the payment API.
pub async fn check<TOrderStore, TTransactionSource>(
    body: web::Json<CheckRequest>,
    api: web::Data<PaymentCheckApi<TOrderStore, TTransactionSource>>,
    config: web::Data<ServerConfig>,
) -> HttpResponse
where
    TOrderStore: OrderStore,
    TTransactionSource: TransactionSource,
{
    let req = body.into_inner();
    let token_ok = req
        .token
        .as_deref()
        .map(|t| validate_check_token(t, &config.nonce_secret, &req.order_id))
        .unwrap_or(false);
    if !token_ok {
        debug!("Check request for order {} failed token validation", req.order_id);
        return JsonResponse::failure("Security check failed. Please refresh the page.");
    }
    let auth = CheckRequestAuth { customer_id: None, order_key: req.order_key.clone() };
    match api.check_order(&req.order_id, &auth).await {
        Ok(outcome) => JsonResponse::success(outcome),
        Err(e @ PaymentCheckError::Config(_)) |
        Err(e @ PaymentCheckError::Unauthorized) |
        Err(e @ PaymentCheckError::OrderNotFound(_)) |
        Err(e @ PaymentCheckError::WrongGateway) => JsonResponse::failure(&e.to_string()),
        Err(PaymentCheckError::Transport(msg)) => {
            warn!("Check for order {} could not reach the payment API: {msg}", req.order_id);
            JsonResponse::failure("Could not reach Binance Pay. Please try again later.")
        },
        Err(PaymentCheckError::StoreError(e)) => {
            error!("Check for order {} hit a store error: {e}", req.order_id);
            JsonResponse::failure("System error. Please try again later.")
        },
    }
}

//----------------------------------------------   Debug  ----------------------------------------------------
route!(latest_transaction => Get "/debug/latest-transaction" impl OrderStore, TransactionSource);
/// Admin-only diagnostic: the single most recent payment record, normalized.
///
/// Used to verify that the configured API key actually sees the account the QR code pays into.
/// The caller must present the configured admin token in the `X-BPG-Admin-Token` header. Unlike
/// the storefront route, this one may leak record detail, which is why it is gated.
pub async fn latest_transaction<TOrderStore, TTransactionSource>(
    req: HttpRequest,
    api: web::Data<PaymentCheckApi<TOrderStore, TTransactionSource>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError>
where
    TOrderStore: OrderStore,
    TTransactionSource: TransactionSource,
{
    let provided = req.headers().get("X-BPG-Admin-Token").and_then(|v| v.to_str().ok());
    if !is_admin(provided, &config.admin_token) {
        return Err(ServerError::Unauthorized);
    }
    let latest = api.latest_transaction().await.map_err(|e| match e {
        PaymentCheckError::Config(msg) => ServerError::ConfigurationError(msg),
        other => ServerError::BackendError(other.to_string()),
    })?;
    let response = match latest {
        Some(record) => JsonResponse::success(json!({
            "message": "Latest Binance Pay record returned (fields normalized).",
            "record": record,
        })),
        None => {
            JsonResponse::failure("No records found. Check API base domain/permissions/account match with the QR code.")
        },
    };
    Ok(response)
}
