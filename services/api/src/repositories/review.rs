//! Review repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::review::Review;

const COLUMNS: &str = "id, property_id, owner_id, user_id, user_name, booking_id, rating, body, \
    property_address, property_type, created_at";

fn map_review(row: PgRow) -> Review {
    Review {
        id: row.get("id"),
        property_id: row.get("property_id"),
        owner_id: row.get("owner_id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        booking_id: row.get("booking_id"),
        rating: row.get("rating"),
        body: row.get("body"),
        property_address: row.get("property_address"),
        property_type: row.get("property_type"),
        created_at: row.get("created_at"),
    }
}

/// New review parameters
pub struct NewReview<'a> {
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub user_name: &'a str,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    pub body: &'a str,
    pub property_address: &'a str,
    pub property_type: &'a str,
}

/// Review repository
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the user already reviewed the property. This check is the
    /// only uniqueness enforcement; there is no unique index behind it.
    pub async fn exists_for(&self, property_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE property_id = $1 AND user_id = $2",
        )
        .bind(property_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Insert a review
    pub async fn create(&self, new: &NewReview<'_>) -> Result<Review> {
        let query = format!(
            r#"
            INSERT INTO reviews
                (property_id, owner_id, user_id, user_name, booking_id, rating, body,
                 property_address, property_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(new.property_id)
            .bind(new.owner_id)
            .bind(new.user_id)
            .bind(new.user_name)
            .bind(new.booking_id)
            .bind(new.rating)
            .bind(new.body)
            .bind(new.property_address)
            .bind(new.property_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_review(row))
    }

    /// Reviews for a property, newest first
    pub async fn for_property(&self, property_id: Uuid) -> Result<Vec<Review>> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE property_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_review).collect())
    }

    /// Reviews across an owner's listings, newest first
    pub async fn for_owner(&self, owner_id: Uuid) -> Result<Vec<Review>> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE owner_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_review).collect())
    }

    /// All ratings currently on a property, for the average recomputation
    pub async fn ratings_for_property(&self, property_id: Uuid) -> Result<Vec<i32>> {
        let ratings: Vec<i32> =
            sqlx::query_scalar("SELECT rating FROM reviews WHERE property_id = $1")
                .bind(property_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ratings)
    }
}
