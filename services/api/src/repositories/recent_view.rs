//! Recently-viewed-property repository

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::recent_view::RecentView;

fn map_view(row: PgRow) -> RecentView {
    RecentView {
        id: row.get("id"),
        user_id: row.get("user_id"),
        property_id: row.get("property_id"),
        viewed_at: row.get("viewed_at"),
    }
}

/// Recent view repository
#[derive(Clone)]
pub struct RecentViewRepository {
    pool: PgPool,
}

impl RecentViewRepository {
    /// Create a new recent view repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a view record, bumping viewed_at when the pair already exists
    pub async fn track(&self, user_id: Uuid, property_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recent_views (user_id, property_id, viewed_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id, property_id) DO UPDATE SET viewed_at = now()
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Last `limit` views of a user, most recent first
    pub async fn recent_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RecentView>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, property_id, viewed_at
            FROM recent_views
            WHERE user_id = $1
            ORDER BY viewed_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(map_view).collect())
    }
}
