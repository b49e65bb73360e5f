//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Customers
//! GET  /get/user               - All customers (no password)
//! POST /auth/login             - Login with email and password
//! POST /auth/register          - Register a customer
//! PUT  /upAdd                  - Replace a customer's address
//! PUT  /changePass             - Change a customer's password
//!
//! # Catalog
//! GET  /get/pd                 - All products
//! GET  /get/searcP             - Search by description and price range
//!
//! # Carts
//! POST /cart                   - Add a product to a named cart
//! GET  /showcartbyid           - Priced carts of a customer
//! ```
//!
//! The paths are fixed by existing API clients.

pub mod account;
pub mod auth;
pub mod cart;
pub mod extract;
pub mod products;

use axum::{
    Router,
    extract::{Request, State},
    http::{Response, StatusCode},
    middleware,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// `{"data": ...}` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"message": ...}` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/get/user", get(account::list_customers))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/upAdd", put(account::update_address))
        .route("/changePass", put(account::change_password))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/get/pd", get(products::index))
        .route("/get/searcP", get(products::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", post(cart::add))
        .route("/showcartbyid", get(cart::show))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(customer_routes())
        .merge(product_routes())
        .merge(cart_routes())
}

/// The complete application: routes, request tracing and Sentry layers.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
