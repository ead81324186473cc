// Snippet CRUD HTTP routes

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use snippets_core::{Principal, Snippet, SnippetFilter, SnippetStore};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{internal_error, not_found, ApiError, ErrorResponse, MessageResponse};
use super::validation::{from_object, parse_json_object, validate_create, validate_update};
use crate::services::SnippetService;

/// Request to create a snippet
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSnippetRequest {
    /// Snippet title (required, at most 200 characters).
    #[schema(example = "Flask Basic Route")]
    pub title: Option<String>,
    /// Snippet body (required, at most 50000 characters).
    #[schema(example = "print('hello')")]
    pub code: Option<String>,
    /// Programming language. Defaults to "plaintext".
    #[schema(example = "python")]
    pub language: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Tag names. Non-string entries are ignored.
    #[schema(value_type = Option<Vec<String>>, example = json!(["flask", "web"]))]
    pub tags: Option<Vec<serde_json::Value>>,
}

/// Request to update a snippet. Only provided fields are updated.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    /// `null` or an empty string clears the description.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Replaces all tags when present.
    #[serde(default, deserialize_with = "deserialize_tags")]
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<Vec<serde_json::Value>>,
}

/// Distinguish an explicit `null` (Some(None)) from an absent field (None)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// `"tags": null` clears the tags
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Vec<serde_json::Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(Some(tags.unwrap_or_default()))
}

/// Query parameters for listing snippets
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListSnippetsQuery {
    /// Filter by language (case-insensitive)
    pub language: Option<String>,
    /// Filter by tag name (case-insensitive)
    pub tag: Option<String>,
}

impl From<ListSnippetsQuery> for SnippetFilter {
    fn from(query: ListSnippetsQuery) -> Self {
        SnippetFilter {
            language: query.language.filter(|s| !s.is_empty()),
            tag: query.tag.filter(|s| !s.is_empty()),
        }
    }
}

/// Snippet IDs are non-negative integers; anything else names no route
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| ErrorResponse::new("Not found").into_response(StatusCode::NOT_FOUND))
}

/// App state for snippet, language and tag routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SnippetService>,
}

impl AppState {
    pub fn new(store: Arc<dyn SnippetStore>) -> Self {
        Self {
            service: Arc::new(SnippetService::new(store)),
        }
    }
}

/// Create snippet routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/snippets", get(list_snippets).post(create_snippet))
        .route(
            "/api/snippets/:id",
            get(get_snippet).put(update_snippet).delete(delete_snippet),
        )
        .with_state(state)
}

/// GET /api/snippets - List snippets, newest first
#[utoipa::path(
    get,
    path = "/api/snippets",
    params(ListSnippetsQuery),
    responses(
        (status = 200, description = "List of snippets", body = Vec<Snippet>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "snippets"
)]
pub async fn list_snippets(
    State(state): State<AppState>,
    Query(query): Query<ListSnippetsQuery>,
) -> Result<Json<Vec<Snippet>>, ApiError> {
    let snippets = state
        .service
        .list(query.into())
        .await
        .map_err(internal_error)?;

    Ok(Json(snippets))
}

/// GET /api/snippets/{id} - Get a snippet by ID
#[utoipa::path(
    get,
    path = "/api/snippets/{id}",
    params(
        ("id" = i64, Path, description = "Snippet ID")
    ),
    responses(
        (status = 200, description = "Snippet found", body = Snippet),
        (status = 404, description = "Snippet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "snippets"
)]
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, ApiError> {
    let id = parse_id(&id)?;
    let snippet = state
        .service
        .get(id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Snippet"))?;

    Ok(Json(snippet))
}

/// POST /api/snippets - Create a snippet
#[utoipa::path(
    post,
    path = "/api/snippets",
    request_body = CreateSnippetRequest,
    responses(
        (status = 201, description = "Snippet created", body = Snippet),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []), ("api_key" = [])),
    tag = "snippets"
)]
pub async fn create_snippet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> Result<(StatusCode, Json<Snippet>), ApiError> {
    let req: CreateSnippetRequest = from_object(parse_json_object(&body)?)?;
    let input = validate_create(req)?;

    let snippet = state
        .service
        .create(&principal, input)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(snippet)))
}

/// PUT /api/snippets/{id} - Update a snippet
#[utoipa::path(
    put,
    path = "/api/snippets/{id}",
    params(
        ("id" = i64, Path, description = "Snippet ID")
    ),
    request_body = UpdateSnippetRequest,
    responses(
        (status = 200, description = "Snippet updated", body = Snippet),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Snippet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []), ("api_key" = [])),
    tag = "snippets"
)]
pub async fn update_snippet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Snippet>, ApiError> {
    let id = parse_id(&id)?;

    // Missing snippet wins over a bad body
    let existing = state.service.get(id).await.map_err(internal_error)?;
    if existing.is_none() {
        return Err(not_found("Snippet"));
    }

    let req: UpdateSnippetRequest = from_object(parse_json_object(&body)?)?;
    let patch = validate_update(req)?;

    let snippet = state
        .service
        .update(&principal, id, patch)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Snippet"))?;

    Ok(Json(snippet))
}

/// DELETE /api/snippets/{id} - Delete a snippet
#[utoipa::path(
    delete,
    path = "/api/snippets/{id}",
    params(
        ("id" = i64, Path, description = "Snippet ID")
    ),
    responses(
        (status = 200, description = "Snippet deleted", body = MessageResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Snippet not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("basic_auth" = []), ("api_key" = [])),
    tag = "snippets"
)]
pub async fn delete_snippet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state
        .service
        .delete(&principal, id)
        .await
        .map_err(internal_error)?;

    if deleted {
        Ok(Json(MessageResponse::new("Snippet deleted successfully")))
    } else {
        Err(not_found("Snippet"))
    }
}
