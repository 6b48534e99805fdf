//! Payment repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::payment::{Payment, PaymentStatus};

const COLUMNS: &str = "id, booking_id, property_id, payer_id, owner_id, amount, currency, \
    order_id, payment_ref, status, payer_name, property_address, created_at, updated_at";

fn map_payment(row: PgRow) -> Payment {
    let status: String = row.get("status");
    Payment {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        property_id: row.get("property_id"),
        payer_id: row.get("payer_id"),
        owner_id: row.get("owner_id"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        order_id: row.get("order_id"),
        payment_ref: row.get("payment_ref"),
        status: PaymentStatus::parse(&status).unwrap_or(PaymentStatus::Created),
        payer_name: row.get("payer_name"),
        property_address: row.get("property_address"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Payment order parameters for a new ledger record
pub struct NewPayment<'a> {
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub payer_id: Uuid,
    pub owner_id: Uuid,
    pub amount: i64,
    pub order_id: &'a str,
    pub payer_name: &'a str,
    pub property_address: &'a str,
}

/// Payment repository
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a freshly created order
    pub async fn create(&self, new: &NewPayment<'_>) -> Result<Payment> {
        let query = format!(
            r#"
            INSERT INTO payments
                (booking_id, property_id, payer_id, owner_id, amount, order_id,
                 payer_name, property_address, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'created')
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(new.booking_id)
            .bind(new.property_id)
            .bind(new.payer_id)
            .bind(new.owner_id)
            .bind(new.amount)
            .bind(new.order_id)
            .bind(new.payer_name)
            .bind(new.property_address)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_payment(row))
    }

    /// Look for a settled payment on a booking
    pub async fn find_paid_for_booking(&self, booking_id: Uuid) -> Result<Option<Payment>> {
        let query =
            format!("SELECT {COLUMNS} FROM payments WHERE booking_id = $1 AND status = 'paid'");
        let row = sqlx::query(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_payment))
    }

    /// Flip an order to paid, attaching the fabricated payment reference.
    /// Returns None when no record exists for the order id.
    pub async fn mark_paid(&self, order_id: &str, payment_ref: &str) -> Result<Option<Payment>> {
        let query = format!(
            r#"
            UPDATE payments
            SET status = 'paid', payment_ref = $2, updated_at = now()
            WHERE order_id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(order_id)
            .bind(payment_ref)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_payment))
    }

    /// Settled payments where the user is payer or owner, newest first
    pub async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM payments
            WHERE (payer_id = $1 OR owner_id = $1) AND status = 'paid'
            ORDER BY created_at DESC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_payment).collect())
    }
}
