// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Snippet Manager API.
// It can be used by both the API server (for Swagger UI)
// and the export-openapi binary (for static spec generation).

use crate::api;
use crate::auth::config::DEFAULT_API_KEY_HEADER;
use snippets_core::{Snippet, TagSummary};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Snippet Manager API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::index::index,
        api::index::health,
        api::snippets::list_snippets,
        api::snippets::get_snippet,
        api::snippets::create_snippet,
        api::snippets::update_snippet,
        api::snippets::delete_snippet,
        api::metadata::list_languages,
        api::metadata::list_tags,
    ),
    components(
        schemas(
            Snippet, TagSummary,
            api::snippets::CreateSnippetRequest,
            api::snippets::UpdateSnippetRequest,
            api::common::ErrorResponse,
            api::common::MessageResponse,
            api::index::ServiceInfo,
            api::index::Endpoints,
            api::index::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service info and health checks"),
        (name = "snippets", description = "Snippet management endpoints"),
        (name = "metadata", description = "Language and tag listings")
    ),
    info(
        title = "Snippet Manager API",
        description = "API for storing, tagging and retrieving code snippets. Reads are public; writes require authentication.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Registers both authentication schemes; a deployment enables one of them
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
            components.add_security_scheme("api_key", api_key_scheme(DEFAULT_API_KEY_HEADER));
        }
    }
}

fn api_key_scheme(header: &str) -> SecurityScheme {
    SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(header)))
}

impl ApiDoc {
    /// OpenAPI document whose `api_key` scheme names the configured header
    pub fn with_api_key_header(header: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(components) = doc.components.as_mut() {
            components.add_security_scheme("api_key", api_key_scheme(header));
        }
        doc
    }

    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
