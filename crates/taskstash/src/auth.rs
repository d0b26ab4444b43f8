//! Bearer-token authentication gate.
//!
//! Identity is out of scope for this service: callers present an opaque
//! API token and the gate answers yes or no. Tokens come from the
//! `API_TOKENS` configuration value.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

/// The set of accepted API tokens.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    tokens: Arc<HashSet<String>>,
}

impl AuthState {
    /// Creates an auth state from the configured tokens.
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: Arc::new(tokens.into_iter().collect()),
        }
    }

    /// Returns true if the presented token is accepted.
    pub fn authorizes(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Returns true if no tokens are configured (every request will fail).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extractor for an authenticated caller. Returns 401 if not authenticated.
pub struct CurrentCaller;

impl<S> FromRequestParts<S> for CurrentCaller
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or((StatusCode::UNAUTHORIZED, "Missing authorization header"))?;

        let header_value = auth_header
            .to_str()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Expected a bearer token"))?;

        if auth_state.authorizes(token) {
            Ok(CurrentCaller)
        } else {
            Err((StatusCode::UNAUTHORIZED, "Unknown API token"))
        }
    }
}
