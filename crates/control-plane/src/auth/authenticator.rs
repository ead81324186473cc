// Authenticator: validates a presented credential against the CredentialStore
// Decision: One Authenticator, two schemes selected by configuration
// Decision: Identity lookups fail closed; usage recording fails open
// Decision: Unknown user, inactive user and wrong password are indistinguishable

use axum::http::{header, HeaderMap};
use snippets_core::{Credential, CredentialStore, Principal, StorageError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::api_key::is_valid_api_key_format;
use super::basic::{parse_basic, BasicCredentials};
use super::config::{ApiKeyHeader, AuthConfig, AuthScheme};
use crate::storage::password::{verify_dummy_password, verify_password};

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential was presented
    #[error("credential missing")]
    MissingCredential,
    /// A credential was presented but could not be decoded
    #[error("credential malformed")]
    MalformedCredential,
    /// Unknown identity, wrong secret, or inactive credential
    #[error("credential invalid")]
    InvalidCredential,
    /// The store could not answer in time
    #[error("credential store unavailable")]
    StoreUnavailable,
}

#[derive(Debug, thiserror::Error)]
enum StoreCallError {
    #[error("credential store timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validates credentials for the configured scheme
#[derive(Clone)]
pub struct Authenticator {
    scheme: AuthScheme,
    store: Arc<dyn CredentialStore>,
    store_timeout: Duration,
    api_key_header: ApiKeyHeader,
}

impl Authenticator {
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let api_key_header = config.resolved_api_key_header();
        if api_key_header.label != config.api_key_header {
            tracing::warn!(
                configured = %config.api_key_header,
                header = %api_key_header.label,
                "Invalid API key header name, using the default"
            );
        }

        Self {
            scheme: config.scheme,
            store,
            store_timeout: config.store_timeout,
            api_key_header,
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// Header read by the API-key scheme
    pub fn api_key_header(&self) -> &ApiKeyHeader {
        &self.api_key_header
    }

    /// Authenticate a request from its headers
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        match self.scheme {
            AuthScheme::ApiKey => {
                let token = headers
                    .get(&self.api_key_header.name)
                    .ok_or(AuthError::MissingCredential)?;
                // Opaque bytes that are not even ASCII can never match a key
                let token = token.to_str().map_err(|_| AuthError::InvalidCredential)?;
                if token.is_empty() {
                    return Err(AuthError::MissingCredential);
                }
                self.authenticate_token(token).await
            }
            AuthScheme::Basic => {
                let value = headers
                    .get(header::AUTHORIZATION)
                    .ok_or(AuthError::MissingCredential)?;
                let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
                let credentials = parse_basic(value).map_err(|e| {
                    tracing::debug!(reason = %e, "Rejecting malformed Basic header");
                    AuthError::MalformedCredential
                })?;
                self.authenticate_password(credentials).await
            }
        }
    }

    async fn authenticate_token(&self, token: &str) -> Result<Principal, AuthError> {
        if !is_valid_api_key_format(token) {
            return Err(AuthError::InvalidCredential);
        }

        let key = self
            .call_store(self.store.find_by_token(token))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "API key lookup failed");
                AuthError::StoreUnavailable
            })?
            .ok_or(AuthError::InvalidCredential)?;

        if !key.active {
            tracing::debug!(key_prefix = %key.key_prefix, "Rejecting inactive API key");
            return Err(AuthError::InvalidCredential);
        }

        let credential = Credential::from(key);
        self.record_usage(&credential).await;
        Ok(credential.principal())
    }

    async fn authenticate_password(
        &self,
        credentials: BasicCredentials,
    ) -> Result<Principal, AuthError> {
        let user = self
            .call_store(self.store.find_by_username(&credentials.username))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed");
                AuthError::StoreUnavailable
            })?;

        let password = credentials.password;
        let Some(user) = user else {
            // Spend the same work as a real verification
            let _ = tokio::task::spawn_blocking(move || verify_dummy_password(&password)).await;
            return Err(AuthError::InvalidCredential);
        };

        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                AuthError::InvalidCredential
            })?
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                false
            });

        if !verified || !user.active {
            return Err(AuthError::InvalidCredential);
        }

        let credential = Credential::from(user);
        self.record_usage(&credential).await;
        Ok(credential.principal())
    }

    /// Best effort: a failure here never changes the authentication outcome
    async fn record_usage(&self, credential: &Credential) {
        if let Err(e) = self.call_store(self.store.record_usage(credential)).await {
            tracing::warn!(
                credential_id = %credential.id(),
                error = %e,
                "Failed to record credential usage"
            );
        }
    }

    async fn call_store<T, F>(&self, fut: F) -> Result<T, StoreCallError>
    where
        F: Future<Output = snippets_core::Result<T>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreCallError::Timeout(self.store_timeout)),
        }
    }
}
