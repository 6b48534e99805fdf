//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::user::{GrantStatus, NewUser, Role, User};

fn map_user(row: PgRow) -> User {
    let role: String = row.get("role");
    let grant_status: String = row.get("grant_status");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::parse(&role).unwrap_or(Role::Renter),
        grant_status: GrantStatus::parse(&grant_status).unwrap_or(GrantStatus::Granted),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user, hashing the supplied password
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.email);

        let password_hash = hash_password(&new_user.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, grant_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, grant_status, created_at, updated_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .bind(new_user.grant_status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(map_user(row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, grant_status, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, grant_status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Get all users
    pub async fn get_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, grant_status, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_user).collect())
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Replace a user's password, keyed by email. Returns false when no such
    /// user exists.
    pub async fn update_password(&self, email: &str, password: &str) -> Result<bool> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip a user's grant status (Owner approval)
    pub async fn set_grant_status(&self, user_id: Uuid, status: GrantStatus) -> Result<bool> {
        info!("Setting grant status of {} to {}", user_id, status.as_str());

        let result = sqlx::query(
            r#"
            UPDATE users
            SET grant_status = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
