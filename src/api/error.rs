use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::{db::StoreError, error::GenerationError};

pub const STORAGE_MESSAGE: &str = "Failed to access your recipe collection";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// JSON error response: `{ "error": ..., "details"?: ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error)
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        error!(error = %err, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            .with_details(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match &err {
            GenerationError::Rejected(_) => StatusCode::BAD_REQUEST,
            GenerationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GenerationError::Configuration(reason) => {
                error!(%reason, "recipe generation is misconfigured");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GenerationError::Exhausted { attempts, .. } => {
                warn!(attempts, error = %err, "recipe generation exhausted its attempts");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => {
                error!(error = %err, "recipe generation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            error: err.user_message().to_string(),
            details: err.details(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "recipe store failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_MESSAGE).with_details(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), INVALID_BODY_MESSAGE).with_details(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.error,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}
