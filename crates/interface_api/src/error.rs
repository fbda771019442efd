//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_expense::ValidationError;
use domain_settlement::{IntegrityError, SettlementError};

/// Message returned for failures whose detail stays in the logs
const INTERNAL_MESSAGE: &str = "Group data could not be processed";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<IntegrityError> for ApiError {
    fn from(err: IntegrityError) -> Self {
        error!(error = %err, "Integrity failure");
        ApiError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        if err.is_not_found() {
            return ApiError::NotFound(err.to_string());
        }
        if let PortError::Conflict { message } = &err {
            return ApiError::Conflict(message.clone());
        }
        error!(error = %err, "Repository failure");
        if err.is_transient() {
            ApiError::Unavailable("Group store is temporarily unavailable".to_string())
        } else {
            ApiError::Internal(INTERNAL_MESSAGE.to_string())
        }
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Validation(e) => e.into(),
            SettlementError::Integrity(e) => e.into(),
            SettlementError::Port(e) => e.into(),
        }
    }
}
