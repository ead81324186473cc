// Authentication and access control
//
// - api_key: key generation and hashing
// - basic: `Authorization: Basic` parsing
// - authenticator: credential validation against the CredentialStore
// - policy: per-route access table
// - middleware: the access gate installed on the router

pub mod api_key;
pub mod authenticator;
pub mod basic;
pub mod config;
pub mod middleware;
pub mod policy;

pub use authenticator::{AuthError, Authenticator};
pub use config::{AdminConfig, ApiKeyHeader, AuthConfig, AuthScheme};
pub use middleware::{access_gate, AuthRejection, AuthState};
pub use policy::{Access, AccessPolicy, PolicyRule};
