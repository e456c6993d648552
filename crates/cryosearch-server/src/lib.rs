//! HTTP API for the cryosearch compound catalog.
//!
//! Wraps a [`CompoundSearcher`] in an axum router. See [`routes`] for the
//! endpoints and [`error`] for the status code mapping.

use std::sync::Arc;

use axum::Router;
use cryosearch::CompoundSearcher;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Creates the application router around `searcher`.
pub fn create_app(searcher: Arc<CompoundSearcher>, config: ServerConfig) -> Router {
    info!(
        backend = searcher.store().backend_name(),
        cors = config.enable_cors,
        "Creating cryosearch application"
    );
    let enable_cors = config.enable_cors;
    let router = routes::create_routes(AppState::new(searcher, config))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}
