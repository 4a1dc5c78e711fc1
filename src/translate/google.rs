use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::TranslationError;
use super::interface::{RawTranslation, Translator};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Client for Google Translate's public `gtx` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<RawTranslation, TranslationError> {
        let params = [
            ("client", "gtx"),
            ("sl", source_lang.unwrap_or("auto")),
            ("tl", target_lang),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Google Translate API error: {} - {}", status, body);
            return Err(TranslationError::Status(status));
        }

        let payload: Value = response.json().await?;
        let translation = parse_gtx_payload(&payload)?;
        debug!(
            "Google Translate: {} chars -> {} chars ({})",
            text.chars().count(),
            translation.text.chars().count(),
            translation.raw
        );
        Ok(translation)
    }
}

/// Pull the translation out of a `gtx` response.
///
/// The payload is a nested array: segments at `[0][*][0]` and the detected
/// source language at `[2]`. The latter is exposed as `{"src": ...}` so the
/// gateway can inspect it like any other metadata.
pub fn parse_gtx_payload(payload: &Value) -> Result<RawTranslation, TranslationError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::Parse("missing segment array at index 0".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslationError::EmptyTranslation);
    }

    let src = payload.get(2).cloned().unwrap_or(Value::Null);
    Ok(RawTranslation {
        text,
        raw: json!({ "src": src }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::DetectedLanguage;

    #[test]
    fn segments_are_concatenated() {
        let payload = json!([
            [["Olá, ", "Hello, ", null, null, 10], ["mundo", "world", null, null, 10]],
            null,
            "en"
        ]);

        let translation = parse_gtx_payload(&payload).unwrap();
        assert_eq!(translation.text, "Olá, mundo");
        assert_eq!(
            DetectedLanguage::from_raw(&translation.raw),
            DetectedLanguage::Recognized("en".into())
        );
    }

    #[test]
    fn missing_language_slot_is_unrecognized() {
        let payload = json!([[["Bonjour", "Hello"]]]);
        let translation = parse_gtx_payload(&payload).unwrap();
        assert_eq!(DetectedLanguage::from_raw(&translation.raw), DetectedLanguage::Unrecognized);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(matches!(
            parse_gtx_payload(&json!({ "error": "quota" })),
            Err(TranslationError::Parse(_))
        ));
        assert!(matches!(
            parse_gtx_payload(&json!([[], null, "en"])),
            Err(TranslationError::EmptyTranslation)
        ));
    }
}
