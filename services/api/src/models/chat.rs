//! Chat message model and conversation views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::PublicUser;

/// Chat message entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub property_id: Option<Uuid>,
    #[serde(rename = "message")]
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for sending a message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub property_id: Option<Uuid>,
    pub message: String,
}

/// The most recent message of a conversation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub sender_id: Uuid,
}

/// One entry in the conversation list: the partner, the latest message,
/// and how many of their messages are still unread
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub user: PublicUser,
    pub last_message: Option<LastMessage>,
    pub unread_count: i64,
}
