use thiserror::Error;

use crate::error::ErrorCode;

/// Client-caused request problems, detected before any external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("O parâmetro \"text\" é obrigatório")]
    MissingText,
    #[error("O parâmetro \"text\" deve ser uma string")]
    InvalidTextType,
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingText => ErrorCode::MissingTextParameter,
            ValidationError::InvalidTextType => ErrorCode::InvalidTextType,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ValidationError::MissingText => "Missing required parameter",
            ValidationError::InvalidTextType => "Invalid parameter type",
        }
    }
}

/// Failures of the external translation capability.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Transport failure, including timeouts
    #[error("translation service unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed translation response: {0}")]
    Parse(String),

    #[error("translation service returned an empty translation")]
    EmptyTranslation,

    /// A failure reported by a translator that does not speak HTTP itself,
    /// such as an SDK client or an in-process engine.
    #[error("translation service error: {0}")]
    Service(String),
}
