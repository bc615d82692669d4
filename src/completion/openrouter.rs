//! OpenRouter API client
//!
//! Direct HTTP client for OpenRouter's OpenAI-compatible chat completion API.

use async_trait::async_trait;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, RequestMessage};
use super::{CompletionError, CompletionProvider};
use crate::config::CompletionConfig;

/// OpenRouter chat completion client
///
/// Holds one `reqwest::Client` so connections are pooled across requests.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client from configuration
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Model selector sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    /// # Errors
    /// * `EmptyApiKey` if no key is configured
    /// * `Request` / `Status` for transport failures and non-2xx responses
    /// * `InvalidJson`, `NoChoices`, `EmptyContent` for unusable response bodies
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::EmptyApiKey);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            url = %url,
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling OpenRouter API"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                "OpenRouter API returned error status"
            );

            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body).map_err(|e| {
            CompletionError::InvalidJson(format!("{} - Response body: {}", e, response_body))
        })?;

        tracing::debug!(choices = parsed.choices.len(), "OpenRouter API response");

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        match choice.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(CompletionError::EmptyContent),
        }
    }
}
