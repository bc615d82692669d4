//! SQLite-backed chat store
//!
//! Handles all database interactions for chats and messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::models::{Chat, ChatSummary, Message};
use super::{ChatStore, StoreError};

const SCHEMA: &str = include_str!("../../migrations/001_create_chats.sql");

#[derive(FromRow)]
struct ChatRow {
    chat_id: String,
    chat_name: String,
    created_at: i64,
    user_id: Option<String>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            chat_id: row.chat_id,
            chat_name: row.chat_name,
            created_at: from_millis(row.created_at),
            user_id: row.user_id,
        }
    }
}

#[derive(FromRow)]
struct MessageRow {
    sender: String,
    message: String,
    timestamp: i64,
    user_id: Option<String>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            sender: row.sender,
            message: row.message,
            timestamp: from_millis(row.timestamp),
            user_id: row.user_id,
        }
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Database connection pool for chat operations
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and apply the schema
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, optionally `sqlite:`-prefixed
    pub async fn connect(db_path: &str) -> Result<Self, StoreError> {
        let file_path = db_path
            .strip_prefix("sqlite://")
            .or_else(|| db_path.strip_prefix("sqlite:"))
            .unwrap_or(db_path);
        let in_memory = file_path.contains(":memory:");

        if !in_memory {
            if let Some(parent) = Path::new(file_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Setup(format!("Failed to create db directory: {}", e))
                    })?;
                }
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StoreError::Setup(format!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database is a separate database,
        // so keep exactly one alive for the life of the pool.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Setup(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to SQLite database at: {}", db_path);

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Setup(format!("Migration failed: {}", e)))?;

        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl ChatStore for SqliteStore {
    async fn create_chat(&self, chat: &Chat) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO chats (chat_id, chat_name, created_at, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&chat.chat_id)
        .bind(&chat.chat_name)
        .bind(chat.created_at.timestamp_millis())
        .bind(&chat.user_id)
        .execute(&self.pool)
        .await?;

        debug!(chat_id = %chat.chat_id, "Created chat");
        Ok(())
    }

    async fn list_chats(&self, owner: Option<&str>) -> Result<Vec<ChatSummary>, StoreError> {
        let rows: Vec<(String, String)> = match owner {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT chat_id, chat_name FROM chats WHERE user_id = ? \
                     ORDER BY created_at ASC, rowid ASC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT chat_id, chat_name FROM chats ORDER BY created_at ASC, rowid ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(chat_id, chat_name)| ChatSummary { chat_id, chat_name })
            .collect())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, StoreError> {
        let row = sqlx::query_as::<_, ChatRow>(
            "SELECT chat_id, chat_name, created_at, user_id FROM chats WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chat::from))
    }

    async fn rename_chat(&self, chat_id: &str, chat_name: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE chats SET chat_name = ? WHERE chat_id = ?")
            .bind(chat_name)
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ChatNotFound(chat_id.to_string()));
        }

        debug!(chat_id = %chat_id, "Renamed chat");
        Ok(())
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let messages = sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM chats WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(chat_id = %chat_id, messages, "Deleted chat");
        Ok(messages)
    }

    async fn add_message(&self, chat_id: &str, message: &Message) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO messages (chat_id, sender, message, timestamp, user_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(chat_id)
        .bind(&message.sender)
        .bind(&message.message)
        .bind(message.timestamp.timestamp_millis())
        .bind(&message.user_id)
        .execute(&self.pool)
        .await?;

        debug!(chat_id = %chat_id, sender = %message.sender, "Added message");
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT sender, message, timestamp, user_id FROM messages WHERE chat_id = ? \
             ORDER BY timestamp ASC, seq ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}
