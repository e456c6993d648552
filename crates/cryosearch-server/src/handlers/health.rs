use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::state::AppState;

/// `GET /health`
///
/// - `200 OK` - datastore reachable, with its record count
/// - `503 Service Unavailable` - datastore failing
pub async fn health_handler(State(state): State<AppState>) -> Response {
    debug!("Processing health check request");
    let store = state.searcher().store();
    let backend = store.backend_name();

    match store.count().await {
        Ok(records) => (
            StatusCode::OK,
            Json(json!({"status": "healthy", "backend": backend, "records": records})),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy", "backend": backend})),
            )
                .into_response()
        }
    }
}
