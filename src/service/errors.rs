// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use super::handler::HandlerError;

/// Errors raised while building or starting a service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Handler '{0}' is already exposed")]
    DuplicateHandler(String),

    #[error("Invalid handler name '{0}'")]
    InvalidName(String),

    #[error("Init hook #{index} failed: {reason}")]
    InitFailed { index: usize, reason: String },

    #[error("A run for task {0:?} is still pending")]
    RunInProgress(Address),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// Errors returned over HTTP
#[derive(Debug, Clone)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    Conflict(String),
    HandlerFailed(String),
    InternalError(String),
    Timeout { function: String, timeout_secs: f64 },
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
            ApiError::HandlerFailed(msg) => ("handler_failed", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
            ApiError::Timeout {
                function,
                timeout_secs,
            } => {
                let mut details = HashMap::new();
                details.insert("timeout_secs".to_string(), serde_json::json!(timeout_secs));
                (
                    "timeout",
                    format!("Function '{}' timed out", function),
                    Some(details),
                )
            }
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::HandlerFailed(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn from_handler(function: &str, err: HandlerError) -> Self {
        match err {
            HandlerError::InvalidInput(message) => ApiError::ValidationError {
                field: "data".to_string(),
                message,
            },
            HandlerError::Timeout(limit) => ApiError::Timeout {
                function: function.to_string(),
                timeout_secs: limit.as_secs_f64(),
            },
            HandlerError::Failed(msg) => ApiError::HandlerFailed(msg),
            HandlerError::Panicked(msg) | HandlerError::Output(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RunInProgress(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::HandlerFailed(msg) => write!(f, "Handler failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Timeout {
                function,
                timeout_secs,
            } => write!(f, "Function '{}' timed out after {}s", function, timeout_secs),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("Request {} failed: {}", request_id, self);
        (self.status_code(), Json(self.to_response(Some(request_id)))).into_response()
    }
}
