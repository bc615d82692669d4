//! Shared application state
//!
//! Every collaborator is constructed once at startup and handed to the
//! router here, so tests can swap in fakes.

use std::sync::Arc;

use crate::auth::{IdentityVerifier, JwtVerifier};
use crate::completion::{CompletionProvider, OpenRouterClient};
use crate::config::Config;
use crate::store::{ChatStore, SqliteStore, StoreError};

/// State passed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Chat and message persistence
    pub store: Arc<dyn ChatStore>,
    /// AI reply generator; `None` stores messages without replying
    pub completion: Option<Arc<dyn CompletionProvider>>,
    /// Bearer token verifier; `None` leaves routes unauthenticated
    pub verifier: Option<Arc<dyn IdentityVerifier>>,
}

impl AppState {
    /// State with a store only: no AI replies, no authentication
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            completion: None,
            verifier: None,
        }
    }

    /// Attach a completion provider
    pub fn with_completion(mut self, completion: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Attach an identity verifier
    pub fn with_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Build the production state described by `config`
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store = SqliteStore::connect(&config.store.database_url).await?;
        let mut state = Self::new(Arc::new(store));

        if let Some(completion) = &config.completion {
            let client = OpenRouterClient::new(completion);
            tracing::info!(model = %client.model(), "AI replies enabled");
            state = state.with_completion(Arc::new(client));
        } else {
            tracing::info!("OPENROUTER_API_KEY not set, AI replies disabled");
        }

        if let Some(auth) = &config.auth {
            tracing::info!(mode = ?auth, "Authentication enabled");
            state = state.with_verifier(Arc::new(JwtVerifier::from_config(auth)));
        } else {
            tracing::warn!("No identity verifier configured, chat routes are unauthenticated");
        }

        Ok(state)
    }
}
