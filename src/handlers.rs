use axum::{
    extract::State,
    http::{Method, Uri},
    Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AppError, ErrorResponse};
use crate::extract::Payload;
use crate::health::HealthReport;
use crate::state::AppState;
use crate::stats::StatsSnapshot;
use crate::translate::{TranslationRequest, TranslationResponse};

const LOG_PREVIEW_CHARS: usize = 50;

/// `POST /api/v1/translate`
///
/// Accepts JSON or urlencoded form bodies; see [`Payload`].
pub async fn translate(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> Result<Json<TranslationResponse>, ErrorResponse> {
    let request = TranslationRequest::from_json(&payload).map_err(|e| {
        warn!(code = ?e.code(), "Validation failed: {}", e);
        AppError::from(e).respond(state.expose_details())
    })?;

    let request_id = Uuid::new_v4();
    let preview: String = request.text.chars().take(LOG_PREVIEW_CHARS).collect();
    info!(
        %request_id,
        target_lang = %request.target_lang,
        source_lang = ?request.source_lang,
        text_length = request.text.chars().count(),
        "Starting translation for text: {}...",
        preview
    );

    match state.gateway.translate(&request).await {
        Ok(response) => {
            info!(
                %request_id,
                response_time = %format!("{:.2}ms", response.translation_time),
                detected_language = %response.detected_language,
                target_language = %response.target_language,
                "Translation completed successfully"
            );
            state.stats.record_success(
                response.translation_time,
                &response.detected_language,
                &response.target_language,
            );
            Ok(Json(response))
        }
        Err(e) => {
            error!(%request_id, error = ?e, "Translation failed: {}", e);
            state.stats.record_failure();
            Err(AppError::from(e).respond(state.expose_details()))
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let report = HealthReport::collect(state.started_at);
    info!(
        uptime = report.uptime,
        rss = report.memory_usage.rss,
        "Health check performed"
    );
    Json(report)
}

/// `GET /api/v1/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, ErrorResponse> {
    match state.stats.current().await {
        Ok(stored) => Ok(Json(stored.snapshot())),
        Err(e) => {
            error!("Failed to read stats: {}", e);
            Err(AppError::from(e).respond(state.expose_details()))
        }
    }
}

/// Fallback for every unmatched route or method.
pub async fn not_found(method: Method, uri: Uri) -> ErrorResponse {
    let err = AppError::NotFound(uri.path().to_string());
    warn!(code = ?err.code(), "Route not found: {} {}", method, uri.path());
    // Nothing diagnostic to hide for a 404.
    err.respond(false)
}
