//! Error responses for the catalog API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type, rendered as a plain-text message
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        if err.is_validation() {
            Self::bad_request(err.to_string())
        } else {
            tracing::error!("Catalog request failed: {}", err);
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
