// Snippet Manager control-plane library
// Decision: Shared library for binaries (API server, admin CLI, OpenAPI export)
// Decision: Router assembly lives here so integration tests drive the real app

use axum::http::{header, Method, StatusCode};
use axum::{middleware, Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication and access control
pub mod auth;

// Environment configuration
pub mod config;

// OpenAPI spec generation
pub mod openapi;

// Services layer
pub mod services;

// Storage layer
pub mod storage;

use api::ErrorResponse;
use auth::{access_gate, AccessPolicy, AuthConfig, AuthState, Authenticator};
use config::ServerConfig;
use storage::Stores;

/// Build the API router with the access gate installed.
///
/// Every route registered here passes through the policy table. Swagger UI
/// and the 404 fallback are outside the gate.
pub fn build_router(stores: &Stores, auth_config: &AuthConfig) -> Router {
    build_router_with_policy(stores, auth_config, AccessPolicy::snippet_manager())
}

/// Same as [`build_router`] with a custom policy table
pub fn build_router_with_policy(
    stores: &Stores,
    auth_config: &AuthConfig,
    policy: AccessPolicy,
) -> Router {
    let authenticator = Authenticator::new(auth_config, stores.credentials.clone());
    let api_doc = openapi::ApiDoc::with_api_key_header(&authenticator.api_key_header().label);
    let auth_state = AuthState::new(auth_config, authenticator, policy);
    let snippets_state = api::AppState::new(stores.snippets.clone());

    let api_routes = Router::new()
        .merge(api::index::routes())
        .merge(api::snippets::routes(snippets_state.clone()))
        .merge(api::metadata::routes(snippets_state))
        .route_layer(middleware::from_fn_with_state(auth_state, access_gate));

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", api_doc))
        .fallback(fallback)
}

/// Full application: router plus CORS and request tracing layers
pub fn build_app(
    stores: &Stores,
    auth_config: &AuthConfig,
    server_config: &ServerConfig,
) -> Router {
    let app = build_router(stores, auth_config);

    // Add CORS layer only if origins are configured
    let app = if server_config.cors_allowed_origins.is_empty() {
        app
    } else {
        let api_key_header = auth_config.resolved_api_key_header().name;
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(server_config.cors_allowed_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    api_key_header,
                ])
                .expose_headers([header::WWW_AUTHENTICATE]),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

async fn fallback() -> (StatusCode, Json<ErrorResponse>) {
    ErrorResponse::new("Not found").into_response(StatusCode::NOT_FOUND)
}
