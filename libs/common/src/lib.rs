//! Common library for the Rentora marketplace
//!
//! This crate provides the shared database layer used by the API service:
//! connection pooling, configuration, health checks, and error types.

pub mod database;
pub mod error;

pub use database::{DatabaseConfig, health_check, init_pool};
pub use error::{DatabaseError, DatabaseResult};
