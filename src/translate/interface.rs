//! Translate interface - actual translation is done by an external service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{TranslationError, ValidationError};

pub const DEFAULT_TARGET_LANG: &str = "en";

/// A validated translation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub target_lang: String,
    /// `None` asks the external service to auto-detect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        target_lang: Option<&str>,
        source_lang: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::MissingText);
        }

        Ok(Self {
            text,
            target_lang: non_empty(target_lang)
                .unwrap_or(DEFAULT_TARGET_LANG)
                .to_string(),
            source_lang: non_empty(source_lang).map(str::to_string),
        })
    }

    /// Validate an arbitrary JSON body.
    ///
    /// `text` that is absent, `null` or empty is missing; any other
    /// non-string value is the wrong type. Language fields that are not
    /// non-empty strings fall back to their defaults.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let text = match body.get("text") {
            None | Some(Value::Null) => return Err(ValidationError::MissingText),
            Some(Value::String(text)) => text.as_str(),
            Some(_) => return Err(ValidationError::InvalidTextType),
        };

        Self::new(
            text,
            body.get("targetLang").and_then(Value::as_str),
            body.get("sourceLang").and_then(Value::as_str),
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Result of a successful translation, returned to the client as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: String,
    pub target_language: String,
    /// Milliseconds spent in the external call.
    pub translation_time: f64,
    pub timestamp: String,
}

/// What the external service hands back: the translated text plus its
/// untyped metadata payload, whose shape is not guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTranslation {
    pub text: String,
    pub raw: Value,
}

/// External translation capability.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<RawTranslation, TranslationError>;
}
