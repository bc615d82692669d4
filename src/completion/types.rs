//! OpenRouter API wire types
//!
//! Structs mirroring the OpenAI-compatible chat completion format.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    /// Model selector
    pub model: &'a str,
    /// Conversation sent to the model
    pub messages: Vec<RequestMessage<'a>>,
}

/// A single prompt message
#[derive(Serialize, Debug)]
pub struct RequestMessage<'a> {
    /// Speaker role, always `"user"` here
    pub role: &'a str,
    /// Message text
    pub content: &'a str,
}

/// Top-level completion response
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    /// Generated alternatives; absent on some error payloads
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One generated alternative
#[derive(Deserialize, Debug)]
pub struct Choice {
    /// The generated message
    pub message: ChoiceMessage,
}

/// Generated message content
#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    /// Text content; may be null for tool-call responses
    #[serde(default)]
    pub content: Option<String>,
}
