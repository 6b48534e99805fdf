//! Rentora marketplace API service
//!
//! REST API for a property-rental marketplace: renters browse and book
//! listings, owners manage properties, bookings and payments, admins
//! moderate accounts. Backed by PostgreSQL via sqlx.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod uploads;
pub mod validation;
