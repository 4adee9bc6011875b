//! Process bootstrap: store initialization, middleware and the listen loop.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::routes;
use crate::store::JsonFileStore;

/// Router plus the global middleware stack.
///
/// The body limit is enforced by the JSON extractor, so an oversized body is
/// answered with the same JSON error shape as any other bad body.
pub fn build_app(state: Arc<AppState>, cfg: &ServerConfig) -> Router {
    routes::create_router(state)
        .layer(DefaultBodyLimit::max(cfg.max_body_bytes))
        .layer(cors_layer(&cfg.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    // invalid entries are skipped
    let mut list: Vec<HeaderValue> = Vec::new();
    for part in origins {
        match HeaderValue::from_str(part) {
            Ok(hv) => list.push(hv),
            Err(_) => warn!(origin = %part, "ignoring invalid CORS origin"),
        }
    }
    if list.is_empty() {
        // no valid origins -> deny cross-origin
        CorsLayer::new().allow_methods(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(list))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Prepare the rate file and serve until Ctrl+C.
pub async fn serve(cfg: ServerConfig) -> Result<()> {
    let store = JsonFileStore::new(&cfg.data_file);
    let dates = store
        .ensure_initialized()
        .await
        .with_context(|| format!("initializing rate store at {}", cfg.data_file.display()))?;
    info!(data_file = %store.path().display(), dates, "rate store ready");

    let state = AppState::new(Arc::new(store));
    let app = build_app(state, &cfg);

    let addr = cfg.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(listen = %addr, "currency converter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(err = ?e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping");
}
