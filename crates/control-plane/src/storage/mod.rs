// Storage layer for the Snippet Manager control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Both backends implement the core traits:
// - CredentialStore: API keys and user accounts
// - SnippetStore: snippets and tags

pub mod memory;
pub mod models;
pub mod password;
pub mod postgres;

use snippets_core::{CredentialStore, SnippetStore};
use std::sync::Arc;

pub use memory::InMemoryDatabase;
pub use postgres::Database;

/// Trait-object handles to the configured backend
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub snippets: Arc<dyn SnippetStore>,
    /// True when running against the in-memory backend
    pub dev_mode: bool,
}

impl Stores {
    /// Create an in-memory backend
    pub fn in_memory() -> Self {
        let db = Arc::new(InMemoryDatabase::new());
        Self {
            credentials: db.clone(),
            snippets: db,
            dev_mode: true,
        }
    }

    /// Connect to PostgreSQL and apply migrations
    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        let db = Arc::new(db);
        Ok(Self {
            credentials: db.clone(),
            snippets: db,
            dev_mode: false,
        })
    }

    /// Select the backend from an optional database URL
    pub async fn connect(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => Self::postgres(url).await,
            None => Ok(Self::in_memory()),
        }
    }
}
