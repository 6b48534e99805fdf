//! Recently-viewed-property tracking

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::property::Property;

/// Recent view record, unique per (user, property)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

/// A recent view joined with its (still existing) property
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentViewEntry {
    pub id: Uuid,
    pub viewed_at: DateTime<Utc>,
    pub property: Property,
}
