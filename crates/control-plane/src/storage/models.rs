// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use snippets_core::{ApiKeyCredential, Snippet, TagSummary, UserCredential};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Credential models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyRow {
    pub id: Uuid,
    pub owner: String,
    pub key_hash: String,
    pub key_prefix: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<ApiKeyRow> for ApiKeyCredential {
    fn from(row: ApiKeyRow) -> Self {
        ApiKeyCredential {
            id: row.id,
            owner: row.owner,
            key_hash: row.key_hash,
            key_prefix: row.key_prefix,
            active: row.active,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        }
    }
}

#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserCredential {
    fn from(row: UserRow) -> Self {
        UserCredential {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            active: row.active,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

// ============================================
// Snippet models
// ============================================

/// Snippet row joined with its ordered tag names
#[derive(Debug, Clone, FromRow)]
pub struct SnippetRow {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SnippetRow> for Snippet {
    fn from(row: SnippetRow) -> Self {
        Snippet {
            id: row.id,
            title: row.title,
            code: row.code,
            language: row.language,
            description: row.description,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub snippet_count: i64,
}

impl From<TagRow> for TagSummary {
    fn from(row: TagRow) -> Self {
        TagSummary {
            id: row.id,
            name: row.name,
            snippet_count: row.snippet_count,
        }
    }
}
