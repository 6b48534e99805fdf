//! Property review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub booking_id: Option<Uuid>,
    pub rating: i32,
    #[serde(rename = "review")]
    pub body: String,
    pub property_address: String,
    pub property_type: String,
    pub created_at: DateTime<Utc>,
}

/// Renter payload submitting a review
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub rating: i32,
    pub review: String,
    pub booking_id: Option<Uuid>,
}

/// Mean of all ratings, rounded to one decimal. Zero when there are no
/// ratings.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i32 = ratings.iter().sum();
    let avg = f64::from(sum) / ratings.len() as f64;
    (avg * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[5]), 5.0);
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert_eq!(average_rating(&[3, 4, 4]), 3.7);
        assert_eq!(average_rating(&[1, 1, 2]), 1.3);
    }
}
