//! Notification routes
//!
//! Clients poll these; nothing is pushed. The list endpoint fails soft so a
//! database outage never blocks the UI shell.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::Notification,
    state::AppState,
};

/// Response for the notification list
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub success: bool,
    pub data: Vec<Notification>,
    pub unread_count: i64,
}

/// Create the router for notification endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read/:id", patch(mark_as_read))
        .route("/readall", patch(mark_all_as_read))
        .route("/:id", delete(delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Latest notifications plus the unread count. Fails soft.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    let result = async {
        let data = state.notification_repository.for_user(auth.id).await?;
        let unread_count = state.notification_repository.unread_count(auth.id).await?;
        anyhow::Ok((data, unread_count))
    }
    .await;

    match result {
        Ok((data, unread_count)) => Json(NotificationListResponse {
            success: true,
            data,
            unread_count,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to fetch notifications: {}", e);
            Json(NotificationListResponse {
                success: true,
                data: vec![],
                unread_count: 0,
            })
            .into_response()
        }
    }
}

/// Mark one notification as read (idempotent)
pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state.notification_repository.mark_read(id).await.map_err(|e| {
        error!("Failed to mark notification read: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(serde_json::json!({ "success": true })).into_response())
}

/// Mark all of the caller's notifications as read (idempotent)
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    state
        .notification_repository
        .mark_all_read(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to mark notifications read: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({ "success": true })).into_response())
}

/// Delete a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state.notification_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete notification: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(serde_json::json!({ "success": true })).into_response())
}
