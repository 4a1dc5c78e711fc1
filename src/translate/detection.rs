use serde_json::Value;

pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Source language as reported by the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLanguage {
    Recognized(String),
    Unrecognized,
}

impl DetectedLanguage {
    /// Parse the untyped metadata payload of the external service.
    ///
    /// Checks `src` first, then `detectedLanguage`, which is either a plain
    /// code or an object carrying the code under `language`.
    pub fn from_raw(raw: &Value) -> Self {
        let src = raw.get("src").and_then(Value::as_str);
        let detected = raw.get("detectedLanguage").and_then(|v| match v {
            Value::String(code) => Some(code.as_str()),
            Value::Object(fields) => fields.get("language").and_then(Value::as_str),
            _ => None,
        });

        match src.filter(|c| !c.is_empty()).or(detected.filter(|c| !c.is_empty())) {
            Some(code) => DetectedLanguage::Recognized(code.to_string()),
            None => DetectedLanguage::Unrecognized,
        }
    }

    /// Fall back to the caller-supplied source when the payload had none.
    pub fn or_requested(self, source_lang: Option<&str>) -> Self {
        match (self, source_lang) {
            (DetectedLanguage::Unrecognized, Some(code)) if !code.is_empty() => {
                DetectedLanguage::Recognized(code.to_string())
            }
            (detected, _) => detected,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            DetectedLanguage::Recognized(code) => code,
            DetectedLanguage::Unrecognized => UNKNOWN_LANGUAGE,
        }
    }
}
