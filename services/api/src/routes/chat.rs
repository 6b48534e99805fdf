//! Chat routes: direct messages between renters and owners

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::cmp::Ordering;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        ApiResponse, Conversation, LastMessage, NotificationKind, SendMessageRequest, excerpt,
    },
    state::AppState,
};

/// Create the router for chat endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send", post(send_message))
        .route("/conversations", get(get_conversations))
        .route("/messages/:otheruserid", get(get_messages))
        .route("/unread-count", get(get_unread_count))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Send a message; the receiver gets a notification with a preview
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "receiverId and message are required".to_string(),
        ));
    }

    let receiver = state
        .user_repository
        .find_by_id(payload.receiver_id)
        .await
        .map_err(|e| {
            error!("Failed to load receiver: {}", e);
            ApiError::InternalServerError
        })?;

    if receiver.is_none() {
        return Err(ApiError::NotFound("Receiver not found".to_string()));
    }

    let message = state
        .chat_repository
        .create(
            auth.id,
            payload.receiver_id,
            payload.property_id,
            &payload.message,
        )
        .await
        .map_err(|e| {
            error!("Failed to store message: {}", e);
            ApiError::InternalServerError
        })?;

    let sender_name = state
        .user_repository
        .find_by_id(auth.id)
        .await
        .ok()
        .flatten()
        .map(|u| u.name)
        .unwrap_or_else(|| "Someone".to_string());

    let preview = if payload.message.chars().count() > 50 {
        format!("{}...", excerpt(&payload.message, 50))
    } else {
        payload.message.clone()
    };

    state
        .notification_repository
        .notify(
            payload.receiver_id,
            NotificationKind::Booking,
            &format!("New message from {}", sender_name),
            &preview,
            Some(message.id),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(message, "Message sent")),
    )
        .into_response())
}

/// Conversation partners with the latest message and unread counts, most
/// recently active first
pub async fn get_conversations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let partner_ids = state.chat_repository.partner_ids(auth.id).await.map_err(|e| {
        error!("Failed to list conversation partners: {}", e);
        ApiError::InternalServerError
    })?;

    let mut conversations = Vec::with_capacity(partner_ids.len());
    for partner_id in partner_ids {
        let Some(partner) = state
            .user_repository
            .find_by_id(partner_id)
            .await
            .map_err(|e| {
                error!("Failed to load partner {}: {}", partner_id, e);
                ApiError::InternalServerError
            })?
        else {
            continue;
        };

        let last_message = state
            .chat_repository
            .last_message_between(auth.id, partner_id)
            .await
            .map_err(|e| {
                error!("Failed to load last message: {}", e);
                ApiError::InternalServerError
            })?
            .map(|m| LastMessage {
                message: m.body,
                created_at: m.created_at,
                sender_id: m.sender_id,
            });

        let unread_count = state
            .chat_repository
            .unread_count_from(partner_id, auth.id)
            .await
            .map_err(|e| {
                error!("Failed to count unread messages: {}", e);
                ApiError::InternalServerError
            })?;

        conversations.push(Conversation {
            user: partner.public(),
            last_message,
            unread_count,
        });
    }

    conversations.sort_by(|a, b| match (&a.last_message, &b.last_message) {
        (Some(x), Some(y)) => y.created_at.cmp(&x.created_at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(Json(ApiResponse::ok(conversations)).into_response())
}

/// Full conversation with another user; their messages are marked read
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(other_user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let messages = state
        .chat_repository
        .messages_between(auth.id, other_user_id)
        .await
        .map_err(|e| {
            error!("Failed to load messages: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .chat_repository
        .mark_read_from(other_user_id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to mark messages read: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::ok(messages)).into_response())
}

/// Total unread messages for the caller
pub async fn get_unread_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let count = state.chat_repository.unread_total(auth.id).await.map_err(|e| {
        error!("Failed to count unread messages: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(serde_json::json!({ "count": count })).into_response())
}
