//! Route table.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// - `POST /search` - full search with did-you-mean
/// - `POST /quickSearch` - type-ahead search
/// - `GET /article/index` - paged catalog with facets
/// - `GET /article/{hash}` - one compound
/// - `GET /references` - grouped citations
/// - `POST /filter` - filtered catalog
/// - `GET /health` - health check
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/search", post(handlers::search_handler))
        .route("/quickSearch", post(handlers::quick_search_handler))
        .route("/article/index", get(handlers::index_handler))
        .route("/article/{hash}", get(handlers::article_handler))
        .route("/references", get(handlers::references_handler))
        .route("/filter", post(handlers::filter_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
}
