pub mod error;

use axum::extract::FromRequest;

pub use error::ApiError;

/// `axum::Json` whose rejections render as [`ApiError`], so a bad body still
/// gets a JSON error response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Fresh identifier attached to list/lookup/append responses.
pub fn new_response_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
