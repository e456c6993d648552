//! `/search` and `/quickSearch`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use cryosearch::{QuickHit, SearchResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body of both search endpoints.
///
/// `search_query` is kept loosely typed so that a missing or non-string
/// query is reported as an invalid query rather than a body error.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_query: Option<Value>,
}

impl SearchRequest {
    fn query(&self) -> Option<&str> {
        self.search_query.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
    pub message: &'static str,
    pub response: SearchResponse,
}

#[derive(Debug, Serialize)]
pub struct QuickSearchEnvelope {
    pub message: &'static str,
    pub results: Vec<QuickHit>,
}

/// `POST /search`
///
/// - `200 OK` - `{message, response: {dym, dym_href, search_results}}`
/// - `400 Bad Request` - missing, unsafe or badly encoded query
/// - `409 Conflict` - query too short
pub async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body?;
    debug!(query = ?request.search_query, "Processing search request");

    let response = state
        .searcher()
        .search(request.query())
        .await
        .map_err(|e| ApiError::from_search_validation(&e))?;

    Ok((
        [(header::CACHE_CONTROL, state.config().search_cache_control())],
        Json(SearchEnvelope {
            message: "Success",
            response,
        }),
    )
        .into_response())
}

/// `POST /quickSearch`
///
/// - `200 OK` - `{message, results: [{name, hash}]}`
/// - `400 Bad Request` - missing, unsafe, badly encoded or too short query
pub async fn quick_search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<QuickSearchEnvelope>> {
    let Json(request) = body?;
    debug!(query = ?request.search_query, "Processing quick search request");

    let results = state.searcher().quick_search(request.query()).await?;
    Ok(Json(QuickSearchEnvelope {
        message: "Success",
        results,
    }))
}
