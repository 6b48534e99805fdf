//! Middleware for JWT token validation and authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Extract and validate the bearer token from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    // Validate the token
    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    // Add the authenticated user to request extensions for use in handlers
    req.extensions_mut().insert(AuthUser { id: claims.sub });

    // Continue with the request
    Ok(next.run(req).await)
}
