//! Chat API endpoints
//!
//! Handles HTTP requests for chats and their messages. When the request
//! carries an [`AuthUser`] every chat-scoped route first checks that the
//! caller owns the chat.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{Chat, ChatSummary, Message};

/// Error text returned for foreign or missing chats
pub const FORBIDDEN_CHAT: &str = "Unauthorized access to chat";

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Sender label; defaults to the caller's uid when authenticated
    #[serde(default)]
    pub sender: Option<String>,
    /// Message body
    pub message: String,
}

/// Request to rename a chat
///
/// The name is kept as raw JSON so a non-string value is a validation
/// error rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    /// New display name
    #[serde(default, rename = "chatName")]
    pub chat_name: Option<Value>,
}

/// Chat list response
///
/// Deployments without an AI provider report bare identifiers.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatListResponse {
    /// `{"chats": [{"chatId", "chatName"}]}`
    Chats { chats: Vec<ChatSummary> },
    /// `{"chatIds": [...]}`
    ChatIds {
        #[serde(rename = "chatIds")]
        chat_ids: Vec<String>,
    },
}

/// Message history response
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    /// Messages, oldest first
    pub messages: Vec<Message>,
}

/// Single-message response used for confirmations and AI replies
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Reply text or confirmation
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

type Caller = Option<Extension<AuthUser>>;

/// Reject unless the authenticated caller owns `chat_id`
///
/// Anonymous requests pass. The check is a plain read before the write,
/// so it does not guard against a concurrent change by the owner.
async fn authorize_chat(
    state: &AppState,
    chat_id: &str,
    user: Option<&AuthUser>,
) -> Result<(), AppError> {
    let Some(user) = user else {
        return Ok(());
    };

    match state.store.get_chat(chat_id).await? {
        Some(chat) if chat.is_owned_by(&user.uid) => Ok(()),
        Some(_) => {
            warn!(chat_id = %chat_id, uid = %user.uid, "Caller does not own chat");
            Err(AppError::Forbidden(FORBIDDEN_CHAT.to_string()))
        }
        None => Err(AppError::Forbidden(FORBIDDEN_CHAT.to_string())),
    }
}

/// Valid names are non-empty JSON strings
fn validate_chat_name(value: Option<Value>) -> Result<String, AppError> {
    match value {
        Some(Value::String(name)) if !name.is_empty() => Ok(name),
        _ => Err(AppError::InvalidChatName),
    }
}

/// POST /chat - Create a new chat
pub async fn create_chat(
    State(state): State<AppState>,
    user: Caller,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let chat = Chat::new(user.map(|Extension(u)| u.uid));
    state.store.create_chat(&chat).await?;

    info!(chat_id = %chat.chat_id, "Chat created");
    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET /chats - List the caller's chats
pub async fn list_chats(
    State(state): State<AppState>,
    user: Caller,
) -> Result<Json<ChatListResponse>, AppError> {
    let owner = user.as_deref().map(|u| u.uid.as_str());
    let chats = state.store.list_chats(owner).await?;

    if state.completion.is_none() {
        let chat_ids = chats.into_iter().map(|c| c.chat_id).collect();
        return Ok(Json(ChatListResponse::ChatIds { chat_ids }));
    }
    Ok(Json(ChatListResponse::Chats { chats }))
}

/// POST /chat/:chatId/message - Store a message and, if enabled, the AI reply
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    user: Caller,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(request) = payload?;
    let user = user.map(|Extension(u)| u);

    let sender = match (request.sender, &user) {
        (Some(sender), _) => sender,
        (None, Some(user)) => user.uid.clone(),
        (None, None) => {
            return Err(AppError::InvalidRequest(
                "missing field `sender`".to_string(),
            ))
        }
    };

    authorize_chat(&state, &chat_id, user.as_ref()).await?;

    let owner = user.map(|u| u.uid);
    let incoming = Message::new(sender, request.message, owner.clone());
    state.store.add_message(&chat_id, &incoming).await?;

    let Some(completion) = state.completion.as_ref() else {
        return Ok((
            StatusCode::CREATED,
            MessageResponse::new("Message sent successfully"),
        ));
    };

    // Only the latest message goes upstream; history stays in the store.
    let reply = completion.complete(&incoming.message).await?;
    state
        .store
        .add_message(&chat_id, &Message::ai_reply(reply.clone(), owner))
        .await?;

    info!(chat_id = %chat_id, reply_len = reply.len(), "AI reply stored");
    Ok((StatusCode::CREATED, MessageResponse::new(reply)))
}

/// GET /chat/:chatId - Get the chat's messages in order
pub async fn get_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    user: Caller,
) -> Result<Json<MessagesResponse>, AppError> {
    authorize_chat(&state, &chat_id, user.as_deref()).await?;

    let messages = state.store.list_messages(&chat_id).await?;
    Ok(Json(MessagesResponse { messages }))
}

/// PUT /chat/:chatId/name - Rename a chat
pub async fn rename_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    user: Caller,
    payload: Result<Json<RenameChatRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload?;
    let chat_name = validate_chat_name(request.chat_name)?;

    authorize_chat(&state, &chat_id, user.as_deref()).await?;
    state.store.rename_chat(&chat_id, &chat_name).await?;

    Ok(MessageResponse::new("Chat name updated successfully"))
}

/// DELETE /chat/:chatId - Delete a chat and all its messages
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    user: Caller,
) -> Result<Json<MessageResponse>, AppError> {
    authorize_chat(&state, &chat_id, user.as_deref()).await?;

    let removed = state.store.delete_chat(&chat_id).await?;
    info!(chat_id = %chat_id, messages = removed, "Chat deleted");

    Ok(MessageResponse::new("Chat deleted successfully"))
}
