// src/server/error.rs
// Centralized error-to-response mapping for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::llm::{ClassifyError, ValidationError};
use crate::store::StoreError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: &'static str,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: "INTERNAL_ERROR",
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            error_code: "NOT_FOUND",
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::CONFLICT,
            error_code: "CONFLICT",
        }
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNPROCESSABLE_ENTITY,
            error_code: "UNPROCESSABLE_ENTITY",
        }
    }

    pub fn bad_gateway(message: impl Into<String>, error_code: &'static str) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
            error_code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            error!("API error {}: {}", self.status_code, self.message);
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code,
                "message": self.message,
            }
        }));

        (self.status_code, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::unprocessable_entity(err.to_string())
    }
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        match err {
            // Model/content problem, not connectivity. Raw content was already
            // logged at warn in the classifier.
            ClassifyError::ResponseSchema { ref reason, .. } => {
                ApiError::bad_gateway(format!("classifier returned invalid content: {reason}"), "RESPONSE_SCHEMA")
            }
            ClassifyError::Completion(inner) => {
                ApiError::bad_gateway(inner.to_string(), "COMPLETION_FAILED")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(msg) => {
                ApiError::conflict(format!("issue already triaged: {msg}"))
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}
