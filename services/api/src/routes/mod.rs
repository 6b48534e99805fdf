//! API routes
//!
//! One router per resource, mounted under the `/api` prefix the SPA
//! consumes. Uploaded media is served statically under `/uploads`.

pub mod admin;
pub mod chat;
pub mod notifications;
pub mod owner;
pub mod payment;
pub mod recent_views;
pub mod user;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{config::ServerConfig, state::AppState};

/// Create the router for the API service
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
            Method::PUT,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/user", user::router(state.clone()))
        .nest("/api/owner", owner::router(state.clone()))
        .nest("/api/admin", admin::router(state.clone()))
        .nest("/api/payment", payment::router(state.clone()))
        .nest("/api/chat", chat::router(state.clone()))
        .nest("/api/notifications", notifications::router(state.clone()))
        .nest("/api/recent-views", recent_views::router(state))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
