use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the HTTP handlers.
///
/// Every variant renders as `{ "success": false, "message": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    DateNotFound(String),

    #[error("{0}")]
    CurrencyNotFound(String),

    #[error("Invalid currency")]
    InvalidCurrency,

    #[error("Route not found")]
    RouteNotFound,

    /// Request body could not be read as JSON; keeps axum's status (400, 413, 415, 422).
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("Failed to access the rate store")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn date_not_found() -> Self {
        Self::DateNotFound("Date not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::DateNotFound(_)
            | Self::CurrencyNotFound(_)
            | Self::InvalidCurrency
            | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(e) => tracing::error!(err = %e, "rate store failure"),
            Self::InvalidBody(e) => tracing::debug!(err = %e, "rejected request body"),
            other => tracing::debug!(message = %other, "lookup miss"),
        }

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
