// Language and tag listing routes

use axum::{extract::State, routing::get, Json, Router};
use snippets_core::TagSummary;

use super::common::{internal_error, ApiError, ErrorResponse};
use super::snippets::AppState;

/// Create language and tag routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/languages", get(list_languages))
        .route("/api/tags", get(list_tags))
        .with_state(state)
}

/// GET /api/languages - Sorted distinct languages used by snippets
#[utoipa::path(
    get,
    path = "/api/languages",
    responses(
        (status = 200, description = "Language names", body = Vec<String>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "metadata"
)]
pub async fn list_languages(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let languages = state.service.languages().await.map_err(internal_error)?;
    Ok(Json(languages))
}

/// GET /api/tags - All tags with snippet counts
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tags with usage counts", body = Vec<TagSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "metadata"
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagSummary>>, ApiError> {
    let tags = state.service.tags().await.map_err(internal_error)?;
    Ok(Json(tags))
}
