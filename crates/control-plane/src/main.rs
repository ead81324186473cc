// Snippet Manager API server
// Decision: One authentication scheme per deployment (AUTH_SCHEME)
// Decision: Without DATABASE_URL the server runs in dev mode on the in-memory backend

use anyhow::{Context, Result};
use snippets_control_plane::auth::{AuthConfig, AuthScheme};
use snippets_control_plane::build_app;
use snippets_control_plane::config::ServerConfig;
use snippets_control_plane::services::{
    ensure_admin_user, issue_bootstrap_api_key, seed_sample_snippets, seed_sample_user,
};
use snippets_control_plane::storage::Stores;
use snippets_core::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize telemetry with OpenTelemetry support
    // Configure via environment variables:
    // - OTEL_SERVICE_NAME: Service name (default: "snippets-control-plane")
    // - OTEL_EXPORTER_OTLP_ENDPOINT: OTLP endpoint (e.g., "http://localhost:4317")
    // - RUST_LOG: Log filter (default: "snippets_control_plane=debug,tower_http=debug")
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == snippets_core::telemetry::DEFAULT_SERVICE_NAME {
        telemetry_config.service_name = "snippets-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("snippets_control_plane=debug,tower_http=debug,info".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());

    // Keep the guard alive for the lifetime of the application
    let _telemetry_guard = init_telemetry(telemetry_config);

    tracing::info!("snippets-control-plane starting...");

    let server_config = ServerConfig::from_env();
    let auth_config = AuthConfig::from_env();

    // Initialize storage
    let stores = Stores::connect(server_config.database_url.as_deref())
        .await
        .context("Failed to connect to database")?;
    if stores.dev_mode {
        tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
    } else {
        tracing::info!("Connected to database");
    }

    tracing::info!(
        scheme = auth_config.scheme.as_str(),
        realm = %auth_config.realm,
        api_key_header = %auth_config.resolved_api_key_header().label,
        store_timeout_ms = auth_config.store_timeout.as_millis() as u64,
        "Authentication configured"
    );

    // Provision credentials
    if let Some(admin) = &auth_config.admin {
        ensure_admin_user(stores.credentials.as_ref(), admin)
            .await
            .context("Failed to create admin user")?;
    }
    match (&auth_config.bootstrap_api_key_owner, stores.dev_mode) {
        (Some(owner), true) => {
            issue_bootstrap_api_key(stores.credentials.as_ref(), owner)
                .await
                .context("Failed to issue bootstrap API key")?;
        }
        (Some(_), false) => {
            tracing::warn!("AUTH_BOOTSTRAP_API_KEY_OWNER ignored outside dev mode");
        }
        (None, _) => {}
    }
    if auth_config.scheme == AuthScheme::Basic
        && auth_config.admin.is_none()
        && stores.dev_mode
        && !server_config.seed_sample_data
    {
        tracing::warn!(
            "No users exist in dev mode; set AUTH_ADMIN_USERNAME and AUTH_ADMIN_PASSWORD to enable writes"
        );
    }

    if server_config.seed_sample_data {
        seed_sample_snippets(stores.snippets.as_ref())
            .await
            .context("Failed to seed sample data")?;
        // Only throwaway databases get the well-known login
        if stores.dev_mode {
            seed_sample_user(stores.credentials.as_ref())
                .await
                .context("Failed to seed sample user")?;
        }
    }

    if server_config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?server_config.cors_allowed_origins, "CORS origins configured");
    }

    let app = build_app(&stores, &auth_config, &server_config);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&server_config.http_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", server_config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
