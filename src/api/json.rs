//! JSON body extractor that rejects with the response envelope.

use axum::extract::{rejection::JsonRejection, FromRequest};
use tracing::warn;

use super::response::ApiResponse;

/// Message returned for any body that cannot be read as the expected JSON
pub const INVALID_BODY: &str = "invalid request body";

/// Drop-in for `axum::Json` whose rejection is a 400 envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiResponse))]
pub struct Json<T>(pub T);

impl From<JsonRejection> for ApiResponse {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        ApiResponse::bad_request(INVALID_BODY)
    }
}
