//! Chat data models
//!
//! Defines the chat and message records as they are stored and serialized.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to every freshly created chat
pub const DEFAULT_CHAT_NAME: &str = "New Chat";

/// Sender label recorded on assistant replies
pub const AI_SENDER: &str = "AI";

/// Current time at the precision the store keeps (milliseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A chat thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Unique, immutable identifier
    pub chat_id: String,
    /// Display name
    pub chat_name: String,
    /// When the chat was created
    pub created_at: DateTime<Utc>,
    /// Owning user (authenticated deployments only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Chat {
    /// Create a new chat with a fresh identifier and the default name
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            chat_id: Uuid::new_v4().to_string(),
            chat_name: DEFAULT_CHAT_NAME.to_string(),
            created_at: now(),
            user_id,
        }
    }

    /// Whether `user_id` may read or modify this chat
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// Identifier and name projection used by chat listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    /// Chat identifier
    pub chat_id: String,
    /// Display name
    pub chat_name: String,
}

/// A single message in a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Who sent it: a user id, `"AI"`, or free text
    pub sender: String,
    /// Message body
    pub message: String,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
    /// Owning user (authenticated deployments only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(sender: String, message: String, user_id: Option<String>) -> Self {
        Self {
            sender,
            message,
            timestamp: now(),
            user_id,
        }
    }

    /// Create an assistant reply
    pub fn ai_reply(message: String, user_id: Option<String>) -> Self {
        Self::new(AI_SENDER.to_string(), message, user_id)
    }
}
