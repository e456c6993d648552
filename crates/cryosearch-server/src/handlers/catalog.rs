//! Direct catalog reads: articles, the paged index, references and filters.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use cryosearch::catalog::{IndexPage, ReferencePage};
use cryosearch::{CompoundRecord, FilterInput, FilterResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ArticleEnvelope {
    pub entry: CompoundRecord,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: FilterInput,
}

/// `GET /article/{hash}`
///
/// - `200 OK` - `{entry}`
/// - `400 Bad Request` - hash is not alphanumeric
/// - `404 Not Found` - no compound with that hash
pub async fn article_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<Json<ArticleEnvelope>> {
    debug!(hash, "Fetching article");
    state
        .searcher()
        .article(&hash)
        .await?
        .map(|entry| Json(ArticleEnvelope { entry }))
        .ok_or_else(|| ApiError::NotFound("No entry found with the provided hash".to_string()))
}

/// `GET /article/index?page&limit`
pub async fn index_handler(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<IndexPage>> {
    let Query(params) = params?;
    let page = state.searcher().index_page(params.page, params.limit).await?;
    Ok(Json(page))
}

/// `GET /references?page&limit&search`
pub async fn references_handler(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<ReferencePage>> {
    let Query(params) = params?;
    let page = state
        .searcher()
        .references(params.page, params.limit, params.search.as_deref())
        .await?;
    Ok(Json(page))
}

/// `POST /filter` with body `{filters: {...}}`
pub async fn filter_handler(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<FilterResponse>> {
    let Json(request) = body?;
    debug!(filters = ?request.filters, "Processing filter request");
    let response = state.searcher().filter(&request.filters).await?;
    Ok(Json(response))
}
