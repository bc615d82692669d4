//! Request authentication
//!
//! Bearer-token identity checks. When a verifier is configured every chat
//! route runs [`require_auth`], which attaches an [`AuthUser`] to the request
//! or rejects it with 401 before any handler (or the store) is reached.

pub mod jwt;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

pub use jwt::JwtVerifier;

/// Authentication failures, all reported as 401
#[derive(Error, Debug)]
pub enum AuthError {
    /// Header absent, not ASCII, or without the `Bearer ` scheme
    #[error("Unauthorized - No token provided")]
    MissingToken,

    /// `Bearer ` prefix followed by nothing
    #[error("Unauthorized - Token is empty")]
    EmptyToken,

    /// Verification failed; the detail is logged, never returned
    #[error("Unauthorized - Invalid token")]
    InvalidToken(String),
}

/// Identity of the caller, derived fresh from the credential on every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Stable user identifier (token subject)
    pub uid: String,
    /// Email claim, when the token carries one
    pub email: Option<String>,
}

/// Validates bearer credentials
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and return the caller's identity
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    // The token ends at the first space after the scheme.
    let token = value
        .strip_prefix("Bearer ")
        .and_then(|rest| rest.split(' ').next())
        .ok_or(AuthError::MissingToken)?;
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

/// Middleware requiring a verified bearer token
///
/// Passes through untouched when no verifier is configured.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(verifier) = state.verifier.as_ref() else {
        return Ok(next.run(req).await);
    };

    let token = bearer_token(req.headers().get(header::AUTHORIZATION))
        .map(str::to_string)
        .map_err(|e| {
            debug!(reason = %e, "Rejected request without usable bearer token");
            e
        })?;

    let user = verifier.verify(&token).await.map_err(|e| {
        if let AuthError::InvalidToken(detail) = &e {
            warn!(detail = %detail, "Token verification failed");
        }
        e
    })?;

    debug!(uid = %user.uid, "Authenticated request");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
