// Core traits for pluggable storage backends
//
// These traits let the HTTP layer run against different backends:
// - In-memory implementations for dev mode and tests
// - PostgreSQL implementations for production
// - Test doubles (failing or slow stores) for the authenticator

use async_trait::async_trait;
use uuid::Uuid;

use crate::credential::{ApiKeyCredential, Credential, IssuedApiKey, UserCredential};
use crate::error::Result;
use crate::snippet::{NewSnippet, Snippet, SnippetFilter, SnippetPatch, TagSummary};

// ============================================================================
// CredentialStore - API keys and user accounts
// ============================================================================

/// Durable lookup of credentials by their natural key
///
/// Implementations enforce token and username uniqueness. Secrets never
/// leave the store in plaintext: API keys are generated here, and passwords
/// are hashed here before being persisted.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an API key by exact token match (no prefix matching)
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiKeyCredential>>;

    /// Find a user by exact, case-sensitive username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>>;

    /// Set last-used (API key) or last-login (user) to now
    async fn record_usage(&self, credential: &Credential) -> Result<()>;

    /// Issue a new API key with a server-generated secret
    async fn create_api_key(&self, owner: &str) -> Result<IssuedApiKey>;

    /// Create a user account, hashing the password before storage.
    ///
    /// Fails with `InvalidInput` for an empty username or password, or a
    /// username containing ':'.
    async fn create_user(&self, username: &str, password: &str) -> Result<UserCredential>;

    /// Enable or disable a credential by id. Returns false if no credential has that id.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool>;
}

// ============================================================================
// SnippetStore - snippets and tags
// ============================================================================

/// Persistence for snippets and their tags
///
/// Inputs are already normalized by the service layer (trimmed, lower-cased
/// tag and language names).
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// List snippets matching the filter, newest first
    async fn list_snippets(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>>;

    async fn get_snippet(&self, id: i64) -> Result<Option<Snippet>>;

    async fn create_snippet(&self, input: NewSnippet) -> Result<Snippet>;

    /// Apply a partial update. Returns None if the snippet does not exist.
    async fn update_snippet(&self, id: i64, patch: SnippetPatch) -> Result<Option<Snippet>>;

    /// Returns false if the snippet does not exist
    async fn delete_snippet(&self, id: i64) -> Result<bool>;

    /// Sorted distinct languages used by snippets
    async fn list_languages(&self) -> Result<Vec<String>>;

    /// All tags with usage counts, in creation order
    async fn list_tags(&self) -> Result<Vec<TagSummary>>;
}
