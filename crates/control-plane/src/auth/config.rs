// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Default to the Basic (username/password) scheme
// Decision: Exactly one scheme is active per deployment

use axum::http::HeaderName;
use std::time::Duration;

/// Default realm sent in the Basic challenge
pub const DEFAULT_REALM: &str = "Snippet Manager API";

/// Default header carrying the API key
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Default bound on a single credential store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// Static API key in a custom header
    ApiKey,
    /// Username/password via `Authorization: Basic`
    #[default]
    Basic,
}

impl AuthScheme {
    /// Parse a scheme name. Unknown values fall back to the default.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "api_key" | "api-key" | "apikey" | "token" => AuthScheme::ApiKey,
            _ => AuthScheme::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::ApiKey => "api_key",
            AuthScheme::Basic => "basic",
        }
    }
}

/// Header carrying the API key, resolved from its configured name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyHeader {
    /// Header to read
    pub name: HeaderName,
    /// Spelling shown to clients in error messages and API docs
    pub label: String,
}

impl ApiKeyHeader {
    /// Resolve a configured header name. Invalid names fall back to the default.
    pub fn resolve(configured: &str) -> Self {
        match HeaderName::from_bytes(configured.as_bytes()) {
            Ok(name) => Self {
                name,
                label: configured.to_string(),
            },
            Err(_) => Self::default(),
        }
    }
}

impl Default for ApiKeyHeader {
    fn default() -> Self {
        Self {
            name: HeaderName::from_static("x-api-key"),
            label: DEFAULT_API_KEY_HEADER.to_string(),
        }
    }
}

/// Admin user created at startup if missing
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Active scheme
    pub scheme: AuthScheme,
    /// Realm for the `WWW-Authenticate` challenge
    pub realm: String,
    /// Header name for the API-key scheme
    pub api_key_header: String,
    /// Timeout for each credential store call
    pub store_timeout: Duration,
    /// Bootstrap admin user
    pub admin: Option<AdminConfig>,
    /// Owner label for a key issued at startup (dev mode only)
    pub bootstrap_api_key_owner: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: AuthScheme::default(),
            realm: DEFAULT_REALM.to_string(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            admin: None,
            bootstrap_api_key_owner: None,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let scheme = std::env::var("AUTH_SCHEME")
            .map(|s| AuthScheme::parse(&s))
            .unwrap_or_default();

        let realm = std::env::var("AUTH_REALM")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_REALM.to_string());

        let api_key_header = std::env::var("AUTH_API_KEY_HEADER")
            .ok()
            .filter(|s| HeaderName::from_bytes(s.as_bytes()).is_ok())
            .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());

        let store_timeout = std::env::var("AUTH_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STORE_TIMEOUT);

        let admin = match (
            std::env::var("AUTH_ADMIN_USERNAME"),
            std::env::var("AUTH_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminConfig { username, password })
            }
            _ => None,
        };

        let bootstrap_api_key_owner = std::env::var("AUTH_BOOTSTRAP_API_KEY_OWNER")
            .ok()
            .filter(|s| !s.is_empty());

        Self {
            scheme,
            realm,
            api_key_header,
            store_timeout,
            admin,
            bootstrap_api_key_owner,
        }
    }

    /// API key header to use for this configuration
    pub fn resolved_api_key_header(&self) -> ApiKeyHeader {
        ApiKeyHeader::resolve(&self.api_key_header)
    }

    /// Value of the `WWW-Authenticate` header for the Basic scheme
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm.replace('"', ""))
    }
}
