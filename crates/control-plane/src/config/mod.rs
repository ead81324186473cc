// Server configuration loaded from environment variables
// Decision: Missing DATABASE_URL means dev mode with the in-memory backend

use axum::http::HeaderValue;

/// Default HTTP listen address
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5001";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub http_addr: String,
    /// PostgreSQL URL. None selects the in-memory backend.
    pub database_url: Option<String>,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_allowed_origins: Vec<HeaderValue>,
    /// Seed sample snippets at startup when the store is empty
    pub seed_sample_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            database_url: None,
            cors_allowed_origins: Vec::new(),
            seed_sample_data: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let http_addr = std::env::var("HTTP_ADDR")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty());

        // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let seed_sample_data = std::env::var("SEED_SAMPLE_DATA")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        Self {
            http_addr,
            database_url,
            cors_allowed_origins,
            seed_sample_data,
        }
    }
}

fn parse_origins(s: &str) -> Vec<HeaderValue> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
