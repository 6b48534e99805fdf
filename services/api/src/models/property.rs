//! Property listing model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdType {
    #[serde(rename = "rent")]
    Rent,
    #[serde(rename = "sale")]
    Sale,
}

impl AdType {
    pub fn as_str(self) -> &'static str {
        match self {
            AdType::Rent => "rent",
            AdType::Sale => "sale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rent" => Some(AdType::Rent),
            "sale" => Some(AdType::Sale),
            _ => None,
        }
    }
}

/// Listing availability, flipped by the booking workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Unavailable => "Unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(Availability::Available),
            "Unavailable" => Some(Availability::Unavailable),
            _ => None,
        }
    }
}

/// An uploaded image reference, stored in the listing's JSONB column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMedia {
    pub filename: String,
    pub path: String,
}

/// An uploaded video reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVideo {
    pub filename: String,
    pub path: String,
    pub original_name: String,
    pub size: u64,
    pub mime_type: String,
}

/// Property entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub property_type: String,
    pub ad_type: AdType,
    pub address: String,
    pub owner_contact: String,
    pub amount: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: Option<String>,
    pub parking: bool,
    pub furnished: String,
    /// Serialized JSON array, kept as a string by construction
    pub amenities: String,
    pub additional_info: Option<String>,
    pub images: Vec<PropertyMedia>,
    pub video: Option<PropertyVideo>,
    pub availability: Availability,
    pub views: i64,
    pub rating: f64,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New listing payload, assembled from the multipart form
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub owner_id: Uuid,
    pub owner_name: String,
    pub property_type: String,
    pub ad_type: AdType,
    pub address: String,
    pub owner_contact: String,
    pub amount: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: Option<String>,
    pub parking: bool,
    pub furnished: String,
    pub amenities: String,
    pub additional_info: Option<String>,
    pub images: Vec<PropertyMedia>,
    pub video: Option<PropertyVideo>,
}

/// Partial listing update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    pub property_type: Option<String>,
    pub ad_type: Option<AdType>,
    pub address: Option<String>,
    pub owner_contact: Option<String>,
    pub amount: Option<i64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<String>,
    pub parking: Option<bool>,
    pub furnished: Option<String>,
    pub amenities: Option<String>,
    pub additional_info: Option<String>,
    pub is_featured: Option<bool>,
}

/// Normalize a client-supplied amenities value to a valid JSON array string.
pub fn normalize_amenities(raw: Option<&str>) -> String {
    match raw {
        Some(s) if serde_json::from_str::<serde_json::Value>(s)
            .map(|v| v.is_array())
            .unwrap_or(false) =>
        {
            s.to_string()
        }
        Some(s) if !s.is_empty() => {
            tracing::warn!("Invalid amenities payload, storing empty list: {}", s);
            "[]".to_string()
        }
        _ => "[]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_type_round_trips() {
        assert_eq!(AdType::parse("rent"), Some(AdType::Rent));
        assert_eq!(AdType::parse("sale"), Some(AdType::Sale));
        assert_eq!(AdType::parse("Rent"), None);
    }

    #[test]
    fn availability_round_trips() {
        assert_eq!(Availability::parse("Available"), Some(Availability::Available));
        assert_eq!(
            Availability::parse("Unavailable"),
            Some(Availability::Unavailable)
        );
        assert_eq!(Availability::parse("available"), None);
    }

    #[test]
    fn amenities_accepts_valid_json_array() {
        let raw = r#"["wifi","parking"]"#;
        assert_eq!(normalize_amenities(Some(raw)), raw);
    }

    #[test]
    fn amenities_falls_back_to_empty_list() {
        assert_eq!(normalize_amenities(Some("wifi, parking")), "[]");
        assert_eq!(normalize_amenities(Some(r#"{"wifi":true}"#)), "[]");
        assert_eq!(normalize_amenities(None), "[]");
    }
}
