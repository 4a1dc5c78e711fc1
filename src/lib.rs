//! HTTP translation service: validates requests, delegates translation to an
//! external provider and keeps request statistics in a local JSON file.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod stats;
pub mod translate;

pub use config::Config;
pub use routes::build_app;
pub use state::AppState;
