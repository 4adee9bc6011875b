//! HTTP route handlers
//!
//! - `rates` - listing, single-date and single-currency lookups, appending a date
//! - `convert` - USD and cross-currency conversion on a stored date
//!
//! Every handler re-reads the store before answering.

pub mod convert;
pub mod rates;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;

use crate::api::ApiError;
use crate::app_state::AppState;

/// Build the API router with state attached. Layers are applied by the caller.
///
/// Trailing slashes are trimmed before routing, so `/api/rates/2026-02-24/`
/// is served the same as `/api/rates/2026-02-24`.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/rates", get(rates::list_rates).post(rates::add_rate))
        .route("/api/rates/:date", get(rates::get_rates_by_date))
        .route("/api/rates/:date/:currency", get(rates::get_currency_rate))
        // Both conversion shapes share a prefix; the segment count picks the handler.
        .route("/api/convert/:date/*rest", get(convert::convert))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state);

    // Router::layer runs after matching, so normalization has to wrap the
    // whole router instead.
    Router::new().fallback_service(NormalizePath::trim_trailing_slash(api))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
