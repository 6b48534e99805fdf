//! Admin moderation routes
//!
//! Only token presence is required here; the Admin role itself is not
//! checked server-side.

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::error;

use crate::{
    error::ApiError,
    middleware::auth_middleware,
    models::{ApiResponse, GrantStatus, GrantStatusRequest, PublicUser},
    state::AppState,
};

/// Create the router for admin endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getallusers", get(get_all_users))
        .route("/handlestatus", post(handle_status))
        .route("/getallproperties", get(get_all_properties))
        .route("/getallbookings", get(get_all_bookings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Every registered account, sanitized
pub async fn get_all_users(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch users: {}", e);
        ApiError::InternalServerError
    })?;

    let users: Vec<PublicUser> = users.iter().map(|u| u.public()).collect();
    Ok(Json(ApiResponse::ok(users)).into_response())
}

/// Approve or revoke an Owner account
pub async fn handle_status(
    State(state): State<AppState>,
    Json(payload): Json<GrantStatusRequest>,
) -> Result<Response, ApiError> {
    let status = if payload.granted {
        GrantStatus::Granted
    } else {
        GrantStatus::Ungranted
    };

    let updated = state
        .user_repository
        .set_grant_status(payload.user_id, status)
        .await
        .map_err(|e| {
            error!("Failed to update grant status: {}", e);
            ApiError::InternalServerError
        })?;

    if !updated {
        return Ok(Json(ApiResponse::fail("User not found")).into_response());
    }

    Ok(Json(ApiResponse::message("User status updated")).into_response())
}

/// Every listing
pub async fn get_all_properties(State(state): State<AppState>) -> Result<Response, ApiError> {
    let properties = state.property_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch properties: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(ApiResponse::ok(properties)).into_response())
}

/// Every booking
pub async fn get_all_bookings(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bookings = state.booking_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch bookings: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(ApiResponse::ok(bookings)).into_response())
}
