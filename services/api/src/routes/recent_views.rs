//! Recently-viewed-property routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{ApiResponse, RecentViewEntry},
    state::AppState,
};

/// Create the router for recent-view endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/track/:propertyid", post(track_view))
        .route("/list", get(list_recent_views))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Record a property view; repeat views bump the timestamp
pub async fn track_view(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(property_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state
        .recent_view_repository
        .track(auth.id, property_id)
        .await
        .map_err(|e| {
            error!("Failed to track view: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::message("View tracked")).into_response())
}

/// Last ten viewed properties; views whose listing was deleted are dropped
pub async fn list_recent_views(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let views = state
        .recent_view_repository
        .recent_for_user(auth.id, 10)
        .await
        .map_err(|e| {
            error!("Failed to fetch recent views: {}", e);
            ApiError::InternalServerError
        })?;

    let mut entries = Vec::with_capacity(views.len());
    for view in views {
        let property = state
            .property_repository
            .find_by_id(view.property_id)
            .await
            .map_err(|e| {
                error!("Failed to load property {}: {}", view.property_id, e);
                ApiError::InternalServerError
            })?;

        if let Some(property) = property {
            entries.push(RecentViewEntry {
                id: view.id,
                viewed_at: view.viewed_at,
                property,
            });
        }
    }

    Ok(Json(ApiResponse::ok(entries)).into_response())
}
