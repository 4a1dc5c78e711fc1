use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::detection::DetectedLanguage;
use super::error::TranslationError;
use super::interface::{TranslationRequest, TranslationResponse, Translator};

/// Wraps the external translator with timing and result shaping.
///
/// Requests reaching the gateway are already validated; a failed external
/// call is returned as-is, without retry.
#[derive(Clone)]
pub struct TranslationGateway {
    translator: Arc<dyn Translator>,
}

impl TranslationGateway {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResponse, TranslationError> {
        let started = Instant::now();
        let result = self
            .translator
            .translate(&request.text, &request.target_lang, request.source_lang.as_deref())
            .await?;
        let translation_time = started.elapsed().as_secs_f64() * 1000.0;

        let detected = DetectedLanguage::from_raw(&result.raw)
            .or_requested(request.source_lang.as_deref());
        debug!(raw = %result.raw, detected = detected.code(), "External translation metadata");

        Ok(TranslationResponse {
            original_text: request.text.clone(),
            translated_text: result.text,
            detected_language: detected.code().to_string(),
            target_language: request.target_lang.clone(),
            translation_time,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}
