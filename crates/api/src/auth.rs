//! Bearer-token verification against the external auth service.
//!
//! The middleware resolves the `Authorization` header to a user identity
//! before the booking handlers run, and attaches it to the request as an
//! [`AuthenticatedUser`] extension so handlers receive an explicit
//! parameter instead of an ambient context value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use domain::UserId;
use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;

/// Authenticated user identity attached to a request after verification.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

/// Errors from token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token was rejected or could not be resolved to a user.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The auth service could not be reached.
    #[error("Auth service unreachable: {0}")]
    Unreachable(String),
}

/// Trait for verifying bearer tokens.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// Resolves a bearer token to the user it authenticates.
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Verifier backed by the external auth service's validate endpoint.
pub struct HttpAuthVerifier {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ValidateResponse {
    user_id: String,
}

impl HttpAuthVerifier {
    /// Creates a new verifier for the auth service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AuthVerifier for HttpAuthVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let url = format!("{}/api/v1/auth/validate", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let uuid = uuid::Uuid::parse_str(&body.user_id)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(UserId::from_uuid(uuid))
    }
}

/// Static token table for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticAuthVerifier {
    /// Creates an empty verifier that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token as authenticating the given user.
    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl AuthVerifier for StaticAuthVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| AuthError::InvalidToken("unknown token".to_string()))
    }
}

/// Middleware: verifies the bearer token and attaches [`AuthenticatedUser`].
pub async fn require_auth(
    State(verifier): State<Arc<dyn AuthVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ApiError::Unauthenticated("missing authorization header".to_string()))?;

    let user_id = verifier
        .verify(token)
        .await
        .map_err(|e| ApiError::Unauthenticated(e.to_string()))?;

    req.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier_resolves_known_token() {
        let user_id = UserId::new();
        let verifier = StaticAuthVerifier::new().with_token("secret", user_id);

        assert_eq!(verifier.verify("secret").await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_static_verifier_rejects_unknown_token() {
        let verifier = StaticAuthVerifier::new();

        let err = verifier.verify("nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
