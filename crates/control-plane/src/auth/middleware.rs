// Access gate middleware
// Decision: Consult the policy table by (method, matched route) before any handler runs
// Decision: Attach the Principal to request extensions on success
// Decision: In the Basic scheme every 401 carries the WWW-Authenticate challenge

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::authenticator::{AuthError, Authenticator};
use super::config::{AuthConfig, AuthScheme};
use super::policy::{Access, AccessPolicy};
use crate::api::common::ErrorResponse;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Authenticator,
    pub policy: Arc<AccessPolicy>,
    api_key_header: String,
    challenge: HeaderValue,
}

impl AuthState {
    pub fn new(config: &AuthConfig, authenticator: Authenticator, policy: AccessPolicy) -> Self {
        let challenge = HeaderValue::from_str(&config.challenge())
            .unwrap_or_else(|_| HeaderValue::from_static("Basic realm=\"Snippet Manager API\""));

        let api_key_header = authenticator.api_key_header().label.clone();

        Self {
            authenticator,
            policy: Arc::new(policy),
            api_key_header,
            challenge,
        }
    }

    fn reject(&self, error: AuthError) -> AuthRejection {
        AuthRejection {
            scheme: self.authenticator.scheme(),
            error,
            api_key_header: self.api_key_header.clone(),
            challenge: self.challenge.clone(),
        }
    }
}

/// 401 response for a failed authentication
#[derive(Debug)]
pub struct AuthRejection {
    scheme: AuthScheme,
    error: AuthError,
    api_key_header: String,
    challenge: HeaderValue,
}

impl AuthRejection {
    fn body(&self) -> ErrorResponse {
        match (self.scheme, self.error) {
            (AuthScheme::ApiKey, AuthError::MissingCredential | AuthError::MalformedCredential) => {
                ErrorResponse::new("API key required").with_message(format!(
                    "Please provide an API key in the {} header",
                    self.api_key_header
                ))
            }
            (AuthScheme::ApiKey, AuthError::InvalidCredential | AuthError::StoreUnavailable) => {
                ErrorResponse::new("Invalid API key")
                    .with_message("The provided API key is invalid or inactive")
            }
            (AuthScheme::Basic, AuthError::MissingCredential | AuthError::MalformedCredential) => {
                ErrorResponse::new("Authentication required")
                    .with_message("Please provide credentials using HTTP Basic authentication")
            }
            (AuthScheme::Basic, AuthError::InvalidCredential | AuthError::StoreUnavailable) => {
                ErrorResponse::new("Invalid credentials")
                    .with_message("The provided username or password is incorrect")
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::UNAUTHORIZED, Json(self.body())).into_response();
        if self.scheme == AuthScheme::Basic {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, self.challenge);
        }
        response
    }
}

/// Gate every routed request through the access policy
pub async fn access_gate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if state.policy.access_for(request.method(), &route) == Access::Public {
        return next.run(request).await;
    }

    match state.authenticator.authenticate(request.headers()).await {
        Ok(principal) => {
            tracing::debug!(
                auth.scheme = state.authenticator.scheme().as_str(),
                auth.outcome = "authorized",
                auth.principal.kind = %principal.kind,
                principal_id = %principal.id,
                method = %request.method(),
                route = %route,
                "Request authorized"
            );
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(error) => {
            tracing::info!(
                auth.scheme = state.authenticator.scheme().as_str(),
                auth.outcome = "rejected",
                reason = %error,
                method = %request.method(),
                route = %route,
                "Request rejected"
            );
            state.reject(error).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(scheme: AuthScheme, error: AuthError) -> AuthRejection {
        AuthRejection {
            scheme,
            error,
            api_key_header: "X-API-Key".to_string(),
            challenge: HeaderValue::from_static("Basic realm=\"Snippet Manager API\""),
        }
    }

    #[test]
    fn test_api_key_bodies() {
        let body = rejection(AuthScheme::ApiKey, AuthError::MissingCredential).body();
        assert_eq!(body.error, "API key required");
        assert_eq!(
            body.message.as_deref(),
            Some("Please provide an API key in the X-API-Key header")
        );

        let body = rejection(AuthScheme::ApiKey, AuthError::InvalidCredential).body();
        assert_eq!(body.error, "Invalid API key");
        assert_eq!(
            body.message.as_deref(),
            Some("The provided API key is invalid or inactive")
        );
    }

    #[test]
    fn test_store_unavailable_looks_like_invalid() {
        for scheme in [AuthScheme::ApiKey, AuthScheme::Basic] {
            assert_eq!(
                rejection(scheme, AuthError::StoreUnavailable).body(),
                rejection(scheme, AuthError::InvalidCredential).body()
            );
        }
    }

    #[test]
    fn test_malformed_basic_looks_like_missing() {
        let body = rejection(AuthScheme::Basic, AuthError::MalformedCredential).body();
        assert_eq!(body.error, "Authentication required");
        assert_eq!(
            body,
            rejection(AuthScheme::Basic, AuthError::MissingCredential).body()
        );
    }

    #[test]
    fn test_challenge_only_for_basic() {
        let response = rejection(AuthScheme::Basic, AuthError::InvalidCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Snippet Manager API\""
        );

        let response = rejection(AuthScheme::ApiKey, AuthError::MissingCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
