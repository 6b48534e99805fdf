//! Response envelope shared by all endpoints
//!
//! The API speaks `{success, message?, data?}`. Domain rejections (duplicate
//! email, bad credentials, duplicate review) travel as HTTP 200 with
//! `success: false`; several owner-facing read endpoints deliberately answer
//! HTTP 200 with an empty `data` when the database is unreachable so the UI
//! stays non-blocking.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_carries_no_data_field() {
        let json = serde_json::to_string(&ApiResponse::fail("User already exists")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"User already exists"}"#);
    }

    #[test]
    fn ok_wraps_data() {
        let json = serde_json::to_string(&ApiResponse::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(json, r#"{"success":true,"data":[1,2,3]}"#);
    }
}
