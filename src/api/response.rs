//! Uniform response envelope for API endpoints.
//!
//! Every endpoint answers with `{ "data": ..., "error": ... }`; the HTTP status
//! travels separately on the response. Internal failures always carry
//! [`GENERIC_ERROR`] so driver or database text never reaches a client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message returned for every internal failure
pub const GENERIC_ERROR: &str = "something went wrong!";

/// JSON body of every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

/// A status code plus envelope, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Envelope,
}

impl ApiResponse {
    /// 200 carrying `data`
    pub fn ok<T: Serialize + ?Sized>(data: &T) -> Self {
        Self::with_data(StatusCode::OK, data)
    }

    pub fn with_data<T: Serialize + ?Sized>(status: StatusCode, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                status,
                body: Envelope {
                    data: Some(value),
                    error: None,
                },
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response data");
                Self::internal()
            }
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Envelope {
                data: None,
                error: Some(message.into()),
            },
        }
    }

    /// Bad request error (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    /// Unauthorized error (401)
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::error(StatusCode::UNAUTHORIZED, message)
    }

    /// Not found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error (500) with the fixed generic message
    pub fn internal() -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.body.data.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.error.as_deref()
    }

    pub fn body(&self) -> &Envelope {
        &self.body
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
