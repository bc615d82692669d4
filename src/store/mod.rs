//! Chat store
//!
//! Persistence for chats and messages behind the [`ChatStore`] trait.
//! [`SqliteStore`] is the production implementation.

pub mod models;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{Chat, ChatSummary, Message, AI_SENDER, DEFAULT_CHAT_NAME};
pub use sqlite::SqliteStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure, reported verbatim
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Update targeted a chat that does not exist
    #[error("No chat to update: {0}")]
    ChatNotFound(String),

    /// Store could not be opened or initialized
    #[error("Failed to initialize store: {0}")]
    Setup(String),
}

/// Persistence operations used by the HTTP handlers
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert a new chat record
    async fn create_chat(&self, chat: &Chat) -> Result<(), StoreError>;

    /// List chats in creation order, restricted to `owner` when given
    async fn list_chats(&self, owner: Option<&str>) -> Result<Vec<ChatSummary>, StoreError>;

    /// Load a chat by id
    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, StoreError>;

    /// Overwrite a chat's display name
    ///
    /// Fails with [`StoreError::ChatNotFound`] when the chat does not exist.
    async fn rename_chat(&self, chat_id: &str, chat_name: &str) -> Result<(), StoreError>;

    /// Delete a chat and all of its messages atomically
    ///
    /// Returns the number of messages removed. Deleting a missing chat is a no-op.
    async fn delete_chat(&self, chat_id: &str) -> Result<u64, StoreError>;

    /// Append a message to a chat
    async fn add_message(&self, chat_id: &str, message: &Message) -> Result<(), StoreError>;

    /// All messages of a chat, oldest first
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, StoreError>;
}
