// Snippet Manager core
//
// This crate holds the DB-agnostic pieces shared by the server and the
// administrative tooling.
//
// Key design decisions:
// - Storage is reached only through traits (CredentialStore, SnippetStore) so
//   backends can be swapped and test doubles injected
// - Credentials never carry plaintext secrets after creation
// - Principal is derived per request and never persisted

// Telemetry (tracing subscriber + optional OTLP export)
pub mod telemetry;

// Domain entity types
pub mod credential;
pub mod snippet;

pub mod error;
pub mod traits;

// Re-exports for convenience
pub use credential::{
    ApiKeyCredential, Credential, IssuedApiKey, Principal, PrincipalKind, UserCredential,
};
pub use error::{Result, StorageError};
pub use snippet::{
    normalize_name, NewSnippet, Snippet, SnippetFilter, SnippetPatch, TagSummary, DEFAULT_LANGUAGE,
};
pub use traits::{CredentialStore, SnippetStore};
