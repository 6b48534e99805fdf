//! Booking repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::property::Availability;

const COLUMNS: &str =
    "id, property_id, renter_id, owner_id, renter_name, phone, status, created_at, updated_at";

fn map_booking(row: PgRow) -> Booking {
    let status: String = row.get("status");
    Booking {
        id: row.get("id"),
        property_id: row.get("property_id"),
        renter_id: row.get("renter_id"),
        owner_id: row.get("owner_id"),
        renter_name: row.get("renter_name"),
        phone: row.get("phone"),
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Booking repository
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking request with status pending. The property is not
    /// checked for availability and no conflict check is made against other
    /// pending bookings for the same listing.
    pub async fn create(
        &self,
        property_id: Uuid,
        renter_id: Uuid,
        owner_id: Uuid,
        renter_name: &str,
        phone: &str,
    ) -> Result<Booking> {
        let query = format!(
            r#"
            INSERT INTO bookings (property_id, renter_id, owner_id, renter_name, phone, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(property_id)
            .bind(renter_id)
            .bind(owner_id)
            .bind(renter_name)
            .bind(phone)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_booking(row))
    }

    /// Find a booking by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_booking))
    }

    /// Bookings placed by a renter, newest first
    pub async fn for_renter(&self, renter_id: Uuid) -> Result<Vec<Booking>> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE renter_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(renter_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_booking).collect())
    }

    /// Bookings against an owner's listings, newest first
    pub async fn for_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_booking).collect())
    }

    /// An owner's bookings currently in the booked state
    pub async fn booked_for_owner(&self, owner_id: Uuid) -> Result<Vec<Booking>> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE owner_id = $1 AND status = 'booked' \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_booking).collect())
    }

    /// All bookings, newest first
    pub async fn get_all(&self) -> Result<Vec<Booking>> {
        let query = format!("SELECT {COLUMNS} FROM bookings ORDER BY created_at DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(map_booking).collect())
    }

    /// Owner decision on a booking: update the booking status and flip the
    /// property's availability in one transaction. `booked` makes the
    /// property Unavailable; any other status restores Available.
    ///
    /// Returns None when the booking does not exist. The property row may
    /// legitimately be gone; the status update still applies.
    pub async fn set_status_with_availability(
        &self,
        booking_id: Uuid,
        property_id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>> {
        let availability = if status == BookingStatus::Booked {
            Availability::Unavailable
        } else {
            Availability::Available
        };

        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(booking_id)
            .bind(status.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE properties SET availability = $2, updated_at = now() WHERE id = $1")
            .bind(property_id)
            .bind(availability.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Booking {} set to {}, property {} now {}",
            booking_id,
            status.as_str(),
            property_id,
            availability.as_str()
        );

        Ok(Some(map_booking(row)))
    }

    /// Renter cancellation. Sets the status to cancelled and nothing else;
    /// the property's availability is left untouched.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_booking))
    }
}
