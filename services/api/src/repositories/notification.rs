//! Notification repository and fan-out helper

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

use crate::models::notification::{Notification, NotificationKind};

const COLUMNS: &str = "id, user_id, kind, title, message, is_read, related_id, created_at";

fn map_notification(row: PgRow) -> Notification {
    let kind: String = row.get("kind");
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::parse(&kind).unwrap_or(NotificationKind::Booking),
        title: row.get("title"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        related_id: row.get("related_id"),
        created_at: row.get("created_at"),
    }
}

/// Notification repository
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification record
    pub async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        related_id: Option<Uuid>,
    ) -> Result<Notification> {
        let query = format!(
            r#"
            INSERT INTO notifications (user_id, kind, title, message, related_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(title)
            .bind(message)
            .bind(related_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_notification(row))
    }

    /// Fire-and-forget creation. Delivery is best-effort: a failed write
    /// never fails the triggering action, it is logged and swallowed.
    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        related_id: Option<Uuid>,
    ) {
        if let Err(e) = self.create(user_id, kind, title, message, related_id).await {
            error!("Failed to create notification for {}: {}", user_id, e);
        }
    }

    /// Latest notifications for a user (most recent 50)
    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 50"
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_notification).collect())
    }

    /// Unread notification count for a user
    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification as read (idempotent)
    pub async fn mark_read(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mark all of a user's notifications as read (idempotent)
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a notification
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
