// Service info and health routes

use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Links to the main collections
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Endpoints {
    #[schema(example = "/api/snippets")]
    pub snippets: String,
    #[schema(example = "/api/languages")]
    pub languages: String,
    #[schema(example = "/api/tags")]
    pub tags: String,
}

/// API welcome message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "Snippet Manager API")]
    pub name: String,
    #[schema(example = "1.0.0")]
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

pub fn routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

/// GET / - API name, version and entry points
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service info", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Snippet Manager API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            snippets: "/api/snippets".to_string(),
            languages: "/api/languages".to_string(),
            tags: "/api/tags".to_string(),
        },
    })
}

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
