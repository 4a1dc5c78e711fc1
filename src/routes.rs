use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use crate::handlers;
use crate::middleware::{cors_layer, trace_layer, PanicResponder};
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    // Dashboard and other assets; anything not on disk is a JSON 404.
    let public = ServeDir::new(state.config.public_path())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        .route(
            "/api/v1/translate",
            post(handlers::translate).fallback(handlers::not_found),
        )
        .route("/api/v1/stats", get(handlers::stats).fallback(handlers::not_found))
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .fallback_service(public)
}

/// The complete application: routes, middleware and state.
pub fn build_app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(trace_layer())
        .layer(cors_layer(&state.config))
        .layer(CatchPanicLayer::custom(PanicResponder {
            expose_details: state.expose_details(),
        }));

    create_routes(&state)
        .layer(middleware)
        .with_state(state)
}
