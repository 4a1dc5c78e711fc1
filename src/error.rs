//! HTTP error envelope shared by every non-2xx response.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::StatsError;
use crate::translate::{TranslationError, ValidationError};

/// Stable machine-readable error identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingTextParameter,
    InvalidTextType,
    TranslationError,
    EndpointNotFound,
    InternalServerError,
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("O caminho {0} não existe")]
    NotFound(String),
    /// The request body could not be read, e.g. it exceeds the size limit.
    #[error("{message}")]
    Body { status: StatusCode, message: String },
    #[error("{0}")]
    Internal(String),
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Body { status, .. } => *status,
            AppError::Translation(_) | AppError::Stats(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(e) => e.code(),
            AppError::Translation(_) => ErrorCode::TranslationError,
            AppError::NotFound(_) => ErrorCode::EndpointNotFound,
            AppError::Stats(_) | AppError::Body { .. } | AppError::Internal(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AppError::Validation(e) => e.category(),
            AppError::Translation(_) => "Translation failed",
            AppError::NotFound(_) => "Endpoint not found",
            AppError::Body { .. } => "Invalid request body",
            AppError::Stats(_) | AppError::Internal(_) => "Internal server error",
        }
    }

    /// Diagnostic text for development mode; `None` for client errors.
    fn diagnostics(&self) -> Option<String> {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) | AppError::Body { .. } => None,
            AppError::Translation(e) => Some(format!("{:?}", e)),
            AppError::Stats(e) => Some(format!("{:?}", e)),
            AppError::Internal(message) => Some(message.clone()),
        }
    }

    pub fn to_api_error(&self, expose_details: bool) -> ApiError {
        ApiError {
            error: self.category().to_string(),
            message: self.to_string(),
            code: self.code(),
            details: if expose_details { self.diagnostics() } else { None },
        }
    }

    /// Freeze the error into a response, deciding once whether details leak.
    pub fn respond(self, expose_details: bool) -> ErrorResponse {
        ErrorResponse {
            status: self.status(),
            body: self.to_api_error(expose_details),
        }
    }
}

/// A ready-to-send error: status code plus [`ApiError`] body.
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ApiError,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
