//! Completion provider
//!
//! Turns a prompt into generated reply text. The HTTP handlers only see the
//! [`CompletionProvider`] trait; [`OpenRouterClient`] is the real implementation.

pub mod openrouter;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use openrouter::OpenRouterClient;

/// Completion errors
#[derive(Error, Debug)]
pub enum CompletionError {
    /// No API key configured
    #[error("API key is empty")]
    EmptyApiKey,

    /// Transport-level failure
    #[error("Failed to send HTTP request to OpenRouter API: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("OpenRouter API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as returned
        body: String,
    },

    /// Body was not the expected JSON
    #[error("Failed to parse JSON response from OpenRouter API: {0}")]
    InvalidJson(String),

    /// Response carried no choices
    #[error("Invalid response from OpenRouter API")]
    NoChoices,

    /// First choice had no text
    #[error("OpenRouter API response contains no content")]
    EmptyContent,
}

/// Generates reply text for a single prompt
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `prompt` as the only user message and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
