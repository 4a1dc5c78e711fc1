use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Response},
    response::IntoResponse,
};
use std::any::Any;
use tower_http::{
    catch_panic::ResponseForPanic,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    classify::{ServerErrorsAsFailures, SharedClassifier},
};
use tracing::{error, warn, Level};

use crate::config::Config;
use crate::error::AppError;
use crate::logging::panic_message;

/// CORS policy from `ALLOWED_ORIGINS`; any origin when unset.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match config.allowed_origins() {
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
        None => layer.allow_origin(AnyOrigin),
    }
}

/// One INFO span per request, closed with status and latency.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Turns a panicking handler into a 500 `INTERNAL_SERVER_ERROR` response.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    pub expose_details: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Self::ResponseBody> {
        let message = panic_message(err.as_ref());
        error!("Internal server error occurred: {}", message);
        AppError::Internal(message)
            .respond(self.expose_details)
            .into_response()
    }
}
