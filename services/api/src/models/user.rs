//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Renter,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Renter => "Renter",
            Role::Owner => "Owner",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Renter" => Some(Role::Renter),
            "Owner" => Some(Role::Owner),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Owner accounts start out ungranted and cannot log in until an admin
/// approves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantStatus {
    #[serde(rename = "granted")]
    Granted,
    #[serde(rename = "ungranted")]
    Ungranted,
}

impl GrantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GrantStatus::Granted => "granted",
            GrantStatus::Ungranted => "ungranted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "granted" => Some(GrantStatus::Granted),
            "ungranted" => Some(GrantStatus::Ungranted),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub grant_status: GrantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The wire representation: everything except the credential hash.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            grant_status: self.grant_status,
            created_at: self.created_at,
        }
    }
}

/// User record as exposed over the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub grant_status: GrantStatus,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload (password still in the clear, hashed by the
/// repository)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub grant_status: GrantStatus,
}

/// Request for user registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "type")]
    pub role: Role,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for a password reset (email + replacement password)
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub password: String,
}

/// Admin payload flipping a user's grant status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantStatusRequest {
    pub user_id: Uuid,
    pub granted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        for role in [Role::Renter, Role::Owner, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("renter"), None);
    }

    #[test]
    fn grant_status_round_trips() {
        assert_eq!(GrantStatus::parse("granted"), Some(GrantStatus::Granted));
        assert_eq!(GrantStatus::parse("ungranted"), Some(GrantStatus::Ungranted));
        assert_eq!(GrantStatus::parse("Granted"), None);
    }

    #[test]
    fn public_user_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Renter,
            grant_status: GrantStatus::Granted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user.public()).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("asha@example.com"));
    }
}
