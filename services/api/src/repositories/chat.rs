//! Chat message repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::chat::ChatMessage;

const COLUMNS: &str = "id, sender_id, receiver_id, property_id, body, is_read, created_at";

fn map_message(row: PgRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        property_id: row.get("property_id"),
        body: row.get("body"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

/// Chat repository
#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    /// Create a new chat repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a message
    pub async fn create(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        property_id: Option<Uuid>,
        body: &str,
    ) -> Result<ChatMessage> {
        let query = format!(
            r#"
            INSERT INTO chat_messages (sender_id, receiver_id, property_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(property_id)
            .bind(body)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_message(row))
    }

    /// Distinct users this user has exchanged messages with
    pub async fn partner_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT receiver_id FROM chat_messages WHERE sender_id = $1
            UNION
            SELECT sender_id FROM chat_messages WHERE receiver_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// The most recent message between two users, in either direction
    pub async fn last_message_between(&self, a: Uuid, b: Uuid) -> Result<Option<ChatMessage>> {
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM chat_messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query(&query)
            .bind(a)
            .bind(b)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_message))
    }

    /// Unread messages sent by `sender` to `receiver`
    pub async fn unread_count_from(&self, sender: Uuid, receiver: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_messages \
             WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE",
        )
        .bind(sender)
        .bind(receiver)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Full conversation between two users, oldest first
    pub async fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<ChatMessage>> {
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM chat_messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(a)
            .bind(b)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_message).collect())
    }

    /// Mark everything `sender` sent to `receiver` as read (idempotent)
    pub async fn mark_read_from(&self, sender: Uuid, receiver: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE chat_messages SET is_read = TRUE \
             WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE",
        )
        .bind(sender)
        .bind(receiver)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Total unread messages addressed to a user
    pub async fn unread_total(&self, receiver: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
