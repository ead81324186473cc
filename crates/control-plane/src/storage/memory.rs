// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: Credential UUIDs generated via uuid v7 (time-ordered)
//
// This implementation mirrors the PostgreSQL backend behind the same traits,
// allowing the server to run without a database for development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use snippets_core::{
    ApiKeyCredential, Credential, CredentialStore, IssuedApiKey, NewSnippet, Result, Snippet,
    SnippetFilter, SnippetPatch, SnippetStore, StorageError, TagSummary, UserCredential,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

use super::password::hash_new_user;
use crate::auth::api_key::{generate_api_key, hash_api_key};

/// Snippet and tag tables, kept under one lock so that a snippet and the
/// tags it creates appear together.
#[derive(Default)]
struct SnippetTables {
    snippets: BTreeMap<i64, Snippet>,
    /// Tag name -> tag id
    tags: HashMap<String, i64>,
    next_snippet_id: i64,
    next_tag_id: i64,
}

impl SnippetTables {
    fn ensure_tags(&mut self, names: &[String]) {
        for name in names {
            if !self.tags.contains_key(name) {
                self.next_tag_id += 1;
                self.tags.insert(name.clone(), self.next_tag_id);
            }
        }
    }
}

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserCredential>>,
    api_keys: RwLock<HashMap<Uuid, ApiKeyCredential>>,
    tables: RwLock<SnippetTables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================
// Credentials
// ============================================

#[async_trait]
impl CredentialStore for InMemoryDatabase {
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiKeyCredential>> {
        let key_hash = hash_api_key(token);
        Ok(self
            .api_keys
            .read()
            .values()
            .find(|k| k.key_hash == key_hash)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn record_usage(&self, credential: &Credential) -> Result<()> {
        let now = Self::now();
        match credential {
            Credential::ApiKey(key) => {
                if let Some(stored) = self.api_keys.write().get_mut(&key.id) {
                    stored.last_used_at = Some(now);
                }
            }
            Credential::User(user) => {
                if let Some(stored) = self.users.write().get_mut(&user.id) {
                    stored.last_login_at = Some(now);
                }
            }
        }
        Ok(())
    }

    async fn create_api_key(&self, owner: &str) -> Result<IssuedApiKey> {
        let generated = generate_api_key();
        let credential = ApiKeyCredential {
            id: Uuid::now_v7(),
            owner: owner.to_string(),
            key_hash: generated.key_hash,
            key_prefix: generated.key_prefix,
            active: true,
            created_at: Self::now(),
            last_used_at: None,
        };

        let mut keys = self.api_keys.write();
        if keys.values().any(|k| k.key_hash == credential.key_hash) {
            return Err(StorageError::conflict("API key"));
        }
        keys.insert(credential.id, credential.clone());

        Ok(IssuedApiKey {
            credential,
            token: generated.key,
        })
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserCredential> {
        // Hash outside the lock; Argon2 is deliberately slow
        let password_hash = hash_new_user(username, password)?;
        let user = UserCredential {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash,
            active: true,
            created_at: Self::now(),
            last_login_at: None,
        };

        let mut users = self.users.write();
        if users.values().any(|u| u.username == username) {
            return Err(StorageError::conflict(format!("username '{}'", username)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool> {
        if let Some(key) = self.api_keys.write().get_mut(&id) {
            key.active = active;
            return Ok(true);
        }
        if let Some(user) = self.users.write().get_mut(&id) {
            user.active = active;
            return Ok(true);
        }
        Ok(false)
    }
}

// ============================================
// Snippets
// ============================================

#[async_trait]
impl SnippetStore for InMemoryDatabase {
    async fn list_snippets(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>> {
        let tables = self.tables.read();
        let mut result: Vec<Snippet> = tables
            .snippets
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn get_snippet(&self, id: i64) -> Result<Option<Snippet>> {
        Ok(self.tables.read().snippets.get(&id).cloned())
    }

    async fn create_snippet(&self, input: NewSnippet) -> Result<Snippet> {
        let now = Self::now();
        let mut tables = self.tables.write();
        tables.ensure_tags(&input.tags);
        tables.next_snippet_id += 1;

        let snippet = Snippet {
            id: tables.next_snippet_id,
            title: input.title,
            code: input.code,
            language: input.language,
            description: input.description,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };
        tables.snippets.insert(snippet.id, snippet.clone());
        Ok(snippet)
    }

    async fn update_snippet(&self, id: i64, patch: SnippetPatch) -> Result<Option<Snippet>> {
        let mut tables = self.tables.write();
        if !tables.snippets.contains_key(&id) {
            return Ok(None);
        }
        if let Some(tags) = &patch.tags {
            tables.ensure_tags(tags);
        }

        let Some(snippet) = tables.snippets.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(snippet);
        snippet.updated_at = Self::now();
        Ok(Some(snippet.clone()))
    }

    async fn delete_snippet(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().snippets.remove(&id).is_some())
    }

    async fn list_languages(&self) -> Result<Vec<String>> {
        let tables = self.tables.read();
        let languages: BTreeSet<String> = tables
            .snippets
            .values()
            .map(|s| s.language.clone())
            .collect();
        Ok(languages.into_iter().collect())
    }

    async fn list_tags(&self) -> Result<Vec<TagSummary>> {
        let tables = self.tables.read();
        let mut tags: Vec<TagSummary> = tables
            .tags
            .iter()
            .map(|(name, id)| TagSummary {
                id: *id,
                name: name.clone(),
                snippet_count: tables
                    .snippets
                    .values()
                    .filter(|s| s.tags.iter().any(|t| t == name))
                    .count() as i64,
            })
            .collect();
        tags.sort_by_key(|t| t.id);
        Ok(tags)
    }
}
