//! JWT ID token verification
//!
//! Firebase ID tokens are RS256-signed; the signing keys are published as a
//! JWKS document and looked up by the token's `kid` header. Self-issued
//! tokens can instead be verified with a shared HS256 secret.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::{AuthError, AuthUser, IdentityVerifier};
use crate::config::AuthConfig;

/// Claims read from a verified token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

enum KeySource {
    Secret(DecodingKey),
    Jwks { url: String, http: reqwest::Client },
}

/// Verifies signed ID tokens
pub struct JwtVerifier {
    keys: KeySource,
    audience: Option<String>,
    issuer: Option<String>,
}

impl JwtVerifier {
    /// Verifier for Firebase ID tokens of `project_id`
    pub fn firebase(project_id: &str, jwks_url: &str) -> Self {
        Self {
            keys: KeySource::Jwks {
                url: jwks_url.to_string(),
                http: reqwest::Client::new(),
            },
            audience: Some(project_id.to_string()),
            issuer: Some(format!("https://securetoken.google.com/{}", project_id)),
        }
    }

    /// Verifier for HS256 tokens signed with `secret`
    pub fn shared_secret(secret: &[u8]) -> Self {
        Self {
            keys: KeySource::Secret(DecodingKey::from_secret(secret)),
            audience: None,
            issuer: None,
        }
    }

    /// Build the verifier described by configuration
    pub fn from_config(config: &AuthConfig) -> Self {
        match config {
            AuthConfig::Firebase {
                project_id,
                jwks_url,
            } => Self::firebase(project_id, jwks_url),
            AuthConfig::SharedSecret { secret } => Self::shared_secret(secret.as_bytes()),
        }
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    async fn fetch_key(
        http: &reqwest::Client,
        url: &str,
        token: &str,
    ) -> Result<DecodingKey, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidToken(format!("malformed header: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no kid".to_string()))?;

        let jwks: JwkSet = http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::InvalidToken(format!("failed to fetch signing keys: {}", e)))?
            .json()
            .await
            .map_err(|e| AuthError::InvalidToken(format!("invalid signing keys: {}", e)))?;

        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown kid: {}", kid)))?;

        DecodingKey::from_jwk(jwk)
            .map_err(|e| AuthError::InvalidToken(format!("unusable signing key: {}", e)))
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let (key, algorithm) = match &self.keys {
            KeySource::Secret(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks { url, http } => {
                (Self::fetch_key(http, url, token).await?, Algorithm::RS256)
            }
        };

        let claims = decode::<IdTokenClaims>(token, &key, &self.validation(algorithm))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        match claims.sub {
            Some(uid) if !uid.is_empty() => Ok(AuthUser {
                uid,
                email: claims.email,
            }),
            _ => Err(AuthError::InvalidToken("missing subject".to_string())),
        }
    }
}
