//! Property repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::property::{
    AdType, Availability, NewProperty, Property, PropertyMedia, PropertyVideo, UpdateProperty,
};

const COLUMNS: &str = "id, owner_id, owner_name, property_type, ad_type, address, owner_contact, \
    amount, bedrooms, bathrooms, area, parking, furnished, amenities, additional_info, images, \
    video, availability, views, rating, is_featured, created_at, updated_at";

fn map_property(row: PgRow) -> Property {
    let ad_type: String = row.get("ad_type");
    let availability: String = row.get("availability");
    let images: Json<Vec<PropertyMedia>> = row.get("images");
    let video: Option<Json<PropertyVideo>> = row.get("video");
    Property {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        owner_name: row.get("owner_name"),
        property_type: row.get("property_type"),
        ad_type: AdType::parse(&ad_type).unwrap_or(AdType::Rent),
        address: row.get("address"),
        owner_contact: row.get("owner_contact"),
        amount: row.get("amount"),
        bedrooms: row.get("bedrooms"),
        bathrooms: row.get("bathrooms"),
        area: row.get("area"),
        parking: row.get("parking"),
        furnished: row.get("furnished"),
        amenities: row.get("amenities"),
        additional_info: row.get("additional_info"),
        images: images.0,
        video: video.map(|v| v.0),
        availability: Availability::parse(&availability).unwrap_or(Availability::Available),
        views: row.get("views"),
        rating: row.get("rating"),
        is_featured: row.get("is_featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Property repository
#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    /// Create a new property repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new listing; availability starts out Available
    pub async fn create(&self, new: &NewProperty) -> Result<Property> {
        let query = format!(
            r#"
            INSERT INTO properties
                (owner_id, owner_name, property_type, ad_type, address, owner_contact, amount,
                 bedrooms, bathrooms, area, parking, furnished, amenities, additional_info,
                 images, video)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(new.owner_id)
            .bind(&new.owner_name)
            .bind(&new.property_type)
            .bind(new.ad_type.as_str())
            .bind(&new.address)
            .bind(&new.owner_contact)
            .bind(new.amount)
            .bind(new.bedrooms)
            .bind(new.bathrooms)
            .bind(&new.area)
            .bind(new.parking)
            .bind(&new.furnished)
            .bind(&new.amenities)
            .bind(&new.additional_info)
            .bind(Json(&new.images))
            .bind(new.video.as_ref().map(Json))
            .fetch_one(&self.pool)
            .await?;

        Ok(map_property(row))
    }

    /// All listings, newest first
    pub async fn get_all(&self) -> Result<Vec<Property>> {
        let query = format!("SELECT {COLUMNS} FROM properties ORDER BY created_at DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(map_property).collect())
    }

    /// Listings of one owner, newest first
    pub async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_property).collect())
    }

    /// Find a listing by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_property))
    }

    /// Partially update a listing. Returns the updated row, or None when the
    /// listing does not exist.
    pub async fn update(&self, id: Uuid, update: &UpdateProperty) -> Result<Option<Property>> {
        let query = format!(
            r#"
            UPDATE properties SET
                property_type = COALESCE($2, property_type),
                ad_type = COALESCE($3, ad_type),
                address = COALESCE($4, address),
                owner_contact = COALESCE($5, owner_contact),
                amount = COALESCE($6, amount),
                bedrooms = COALESCE($7, bedrooms),
                bathrooms = COALESCE($8, bathrooms),
                area = COALESCE($9, area),
                parking = COALESCE($10, parking),
                furnished = COALESCE($11, furnished),
                amenities = COALESCE($12, amenities),
                additional_info = COALESCE($13, additional_info),
                is_featured = COALESCE($14, is_featured),
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(&update.property_type)
            .bind(update.ad_type.map(|t| t.as_str()))
            .bind(&update.address)
            .bind(&update.owner_contact)
            .bind(update.amount)
            .bind(update.bedrooms)
            .bind(update.bathrooms)
            .bind(&update.area)
            .bind(update.parking)
            .bind(&update.furnished)
            .bind(&update.amenities)
            .bind(&update.additional_info)
            .bind(update.is_featured)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(map_property))
    }

    /// Delete a listing
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the view counter
    pub async fn increment_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE properties SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Write back a recomputed average rating
    pub async fn set_rating(&self, id: Uuid, rating: f64) -> Result<()> {
        sqlx::query("UPDATE properties SET rating = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
