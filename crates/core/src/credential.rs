// Credential and principal types
//
// Credentials are created by administrative action only and are never
// deleted: disabling sets `active = false`. Secrets are never stored in
// plaintext (API keys as a SHA-256 digest, passwords as an Argon2id hash).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Stored API key record. The plaintext token is only known at creation time.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyCredential {
    pub id: Uuid,
    /// Label of whoever the key was issued to.
    pub owner: String,
    /// Hex SHA-256 digest of the token.
    pub key_hash: String,
    /// First characters of the token, safe to display.
    pub key_prefix: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for ApiKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredential")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("key_prefix", &self.key_prefix)
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .field("last_used_at", &self.last_used_at)
            .finish_non_exhaustive()
    }
}

/// Stored user account for the password scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub id: Uuid,
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Argon2id PHC string. Never the plaintext password.
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("active", &self.active)
            .field("created_at", &self.created_at)
            .field("last_login_at", &self.last_login_at)
            .finish_non_exhaustive()
    }
}

/// A credential of either scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(ApiKeyCredential),
    User(UserCredential),
}

impl Credential {
    pub fn id(&self) -> Uuid {
        match self {
            Credential::ApiKey(key) => key.id,
            Credential::User(user) => user.id,
        }
    }

    /// Derive the per-request principal for this credential.
    pub fn principal(&self) -> Principal {
        match self {
            Credential::ApiKey(key) => Principal {
                id: key.id,
                label: key.owner.clone(),
                kind: PrincipalKind::ApiKey,
            },
            Credential::User(user) => Principal {
                id: user.id,
                label: user.username.clone(),
                kind: PrincipalKind::User,
            },
        }
    }
}

impl From<ApiKeyCredential> for Credential {
    fn from(key: ApiKeyCredential) -> Self {
        Credential::ApiKey(key)
    }
}

impl From<UserCredential> for Credential {
    fn from(user: UserCredential) -> Self {
        Credential::User(user)
    }
}

/// An API key as returned from creation: the record plus the one-time token.
#[derive(Clone)]
pub struct IssuedApiKey {
    pub credential: ApiKeyCredential,
    /// Plaintext token, 64 hex characters. Shown once, never stored.
    pub token: String,
}

impl fmt::Debug for IssuedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedApiKey")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

/// How a principal authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    ApiKey,
    User,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::ApiKey => write!(f, "api_key"),
            PrincipalKind::User => write!(f, "user"),
        }
    }
}

/// Identity resolved from a validated credential, scoped to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// ID of the credential that authenticated the request.
    pub id: Uuid,
    /// Key owner or username.
    pub label: String,
    pub kind: PrincipalKind,
}
