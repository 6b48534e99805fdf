//! Booking model and lifecycle payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle state: pending -> booked | cancelled.
/// There is no distinct "completed" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "booked")]
    Booked,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "booked" => Some(BookingStatus::Booked),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    pub renter_id: Uuid,
    pub owner_id: Uuid,
    pub renter_name: String,
    pub phone: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Renter payload for a new booking request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub renter_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Owner payload changing a booking's status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatusRequest {
    pub booking_id: Uuid,
    pub property_id: Uuid,
    pub status: BookingStatus,
}

/// A booked listing enriched with tenant and property details, for the
/// owner's booked-properties view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedProperty {
    pub booking_id: Uuid,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub booking_status: BookingStatus,
    pub property_type: String,
    pub property_address: String,
    pub property_amt: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub furnished: String,
    pub property_ad_type: String,
    pub owner_name: String,
    pub booked_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Booked,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("completed"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
