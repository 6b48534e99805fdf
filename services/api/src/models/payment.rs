//! Payment ledger model
//!
//! Orders are recorded locally; "verification" flips the record to paid and
//! fabricates a payment reference. There is no gateway integration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PaymentStatus::Created),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub payer_id: Uuid,
    pub owner_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    pub payment_ref: Option<String>,
    pub status: PaymentStatus,
    pub payer_name: String,
    pub property_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to open a payment order for a booking
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub booking_id: Uuid,
}

/// Request to verify (settle) an order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
}

/// Order details returned to the client; the amount is in the currency's
/// minor unit
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            PaymentStatus::Created,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("settled"), None);
    }
}
