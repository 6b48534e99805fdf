//! Notification records created as side effects of workflow mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "booking")]
    Booking,
    #[serde(rename = "property")]
    Property,
    #[serde(rename = "booking_status")]
    BookingStatus,
    #[serde(rename = "review")]
    Review,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Booking => "booking",
            NotificationKind::Property => "property",
            NotificationKind::BookingStatus => "booking_status",
            NotificationKind::Review => "review",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booking" => Some(NotificationKind::Booking),
            "property" => Some(NotificationKind::Property),
            "booking_status" => Some(NotificationKind::BookingStatus),
            "review" => Some(NotificationKind::Review),
            _ => None,
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// First `max` characters of `s`, cut on a char boundary. Used to keep
/// property addresses and chat previews short inside notification messages.
pub fn excerpt(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in [
            NotificationKind::Booking,
            NotificationKind::Property,
            NotificationKind::BookingStatus,
            NotificationKind::Review,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("payment"), None);
    }

    #[test]
    fn excerpt_truncates_long_text() {
        assert_eq!(excerpt("12 Hill Road, Bandra West, Mumbai", 12), "12 Hill Road");
        assert_eq!(excerpt("short", 40), "short");
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("日本語のテキスト", 3), "日本語");
    }
}
