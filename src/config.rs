//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Everything is read once at process start.

use std::env;
use thiserror::Error;

/// Default OpenRouter endpoint (OpenAI-compatible API)
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Model used for every completion request unless overridden
pub const DEFAULT_OPENROUTER_MODEL: &str = "rekaai/reka-flash-3:free";

/// Public key set used to sign Firebase ID tokens
pub const DEFAULT_FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value found in the environment
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Store configuration
    pub store: StoreConfig,
    /// Completion provider configuration (`None` disables AI replies)
    pub completion: Option<CompletionConfig>,
    /// Identity verification configuration (`None` disables authentication)
    pub auth: Option<AuthConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Single allowed cross-origin caller; permissive CORS when unset
    pub cors_origin: Option<String>,
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database location, with or without the `sqlite:` prefix
    pub database_url: String,
}

/// Completion provider configuration
#[derive(Clone)]
pub struct CompletionConfig {
    /// OpenRouter API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model selector sent with every request
    pub model: String,
}

// Keep the key out of startup logs.
impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// How bearer tokens are verified
#[derive(Clone)]
pub enum AuthConfig {
    /// Firebase ID tokens, RS256 keys fetched from a JWKS endpoint
    Firebase {
        /// Firebase project id (token audience)
        project_id: String,
        /// JWKS endpoint
        jwks_url: String,
    },
    /// Self-issued HS256 tokens signed with a shared secret
    SharedSecret {
        /// HMAC secret
        secret: String,
    },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::Firebase {
                project_id,
                jwks_url,
            } => f
                .debug_struct("Firebase")
                .field("project_id", project_id)
                .field("jwks_url", jwks_url)
                .finish(),
            AuthConfig::SharedSecret { .. } => f
                .debug_struct("SharedSecret")
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let completion = var("OPENROUTER_API_KEY").map(|api_key| CompletionConfig {
            api_key,
            base_url: var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            model: var("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
        });

        let auth = match (var("FIREBASE_PROJECT_ID"), var("AUTH_JWT_SECRET")) {
            (Some(project_id), _) => Some(AuthConfig::Firebase {
                project_id,
                jwks_url: var("AUTH_JWKS_URL")
                    .unwrap_or_else(|| DEFAULT_FIREBASE_JWKS_URL.to_string()),
            }),
            (None, Some(secret)) => Some(AuthConfig::SharedSecret { secret }),
            (None, None) => None,
        };

        Ok(Self {
            server: ServerConfig {
                port,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_origin: var("CORS_ORIGIN"),
            },
            store: StoreConfig {
                database_url: var("DATABASE_URL").unwrap_or_else(|| "data/chats.db".to_string()),
            },
            completion,
            auth,
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.store.database_url, "data/chats.db");
        assert!(config.server.cors_origin.is_none());
        assert!(config.completion.is_none());
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_completion_enabled_by_api_key() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "sk-test")])).unwrap();
        let completion = config.completion.unwrap();
        assert_eq!(completion.api_key, "sk-test");
        assert_eq!(completion.base_url, DEFAULT_OPENROUTER_BASE_URL);
        assert_eq!(completion.model, DEFAULT_OPENROUTER_MODEL);
        assert!(!format!("{:?}", completion).contains("sk-test"));
    }

    #[test]
    fn test_empty_api_key_disables_completion() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "  ")])).unwrap();
        assert!(config.completion.is_none());
    }

    #[test]
    fn test_firebase_takes_precedence_over_secret() {
        let config = Config::from_lookup(lookup(&[
            ("FIREBASE_PROJECT_ID", "demo-project"),
            ("AUTH_JWT_SECRET", "secret"),
        ]))
        .unwrap();
        match config.auth {
            Some(AuthConfig::Firebase {
                project_id,
                jwks_url,
            }) => {
                assert_eq!(project_id, "demo-project");
                assert_eq!(jwks_url, DEFAULT_FIREBASE_JWKS_URL);
            }
            other => panic!("Expected Firebase auth config, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_secret_auth() {
        let config = Config::from_lookup(lookup(&[("AUTH_JWT_SECRET", "s3cret")])).unwrap();
        assert!(matches!(
            config.auth,
            Some(AuthConfig::SharedSecret { ref secret }) if secret == "s3cret"
        ));
    }

    #[test]
    fn test_server_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("CORS_ORIGIN", "http://localhost:5173"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr(), "127.0.0.1:8081");
        assert_eq!(
            config.server.cors_origin.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(config.store.database_url, "sqlite::memory:");
    }
}
