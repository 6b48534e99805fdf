//! Renter-facing routes: registration, login, browsing, bookings, reviews

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        ApiResponse, BookingRequest, ForgotPasswordRequest, GrantStatus, LoginRequest,
        NotificationKind, NewUser, PublicUser, RegisterRequest, Role, SubmitReviewRequest,
        excerpt,
        property::normalize_amenities,
        review::average_rating,
    },
    state::AppState,
    validation,
};

use crate::repositories::review::NewReview;

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// Create the router for renter-facing endpoints
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/getuserdata", post(get_user_data))
        .route("/bookinghandle/:propertyid", post(booking_handle))
        .route("/getallbookings", get(get_all_bookings))
        .route("/cancelbooking/:bookingid", patch(cancel_booking))
        .route("/submitreview", post(submit_review))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgotpassword", post(forgot_password))
        .route("/getAllProperties", get(get_all_properties))
        .route("/getreviews/:propertyid", get(get_property_reviews))
        .merge(protected)
        .with_state(state)
}

/// Register a new account. Owner accounts start ungranted and are unlocked
/// by an admin.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if let Err(msg) = validation::validate_name(&payload.name)
        .and_then(|_| validation::validate_email(&payload.email))
        .and_then(|_| validation::validate_password(&payload.password))
    {
        return Ok(Json(ApiResponse::fail(msg)).into_response());
    }

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Ok(Json(ApiResponse::fail("User already exists")).into_response());
    }

    let grant_status = match payload.role {
        Role::Owner => GrantStatus::Ungranted,
        _ => GrantStatus::Granted,
    };

    let new_user = NewUser {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        role: payload.role,
        grant_status,
    };

    state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Register Success")),
    )
        .into_response())
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    info!("Login attempt for {}", payload.email);

    if !state.rate_limiter.is_allowed(&payload.email).await {
        return Err(ApiError::TooManyRequests);
    }

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(user) = user else {
        return Ok(Json(ApiResponse::fail("User not found")).into_response());
    };

    let matches = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !matches {
        return Ok(Json(ApiResponse::fail("Invalid email or password")).into_response());
    }

    // Grant status gates Owner login
    if user.role == Role::Owner && user.grant_status == GrantStatus::Ungranted {
        return Ok(
            Json(ApiResponse::fail("Your account is pending admin approval")).into_response(),
        );
    }

    let token = state.jwt_service.generate_token(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: user.public(),
    };

    Ok(Json(response).into_response())
}

/// Reset a password by email
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Response, ApiError> {
    if let Err(msg) = validation::validate_password(&payload.password) {
        return Ok(Json(ApiResponse::fail(msg)).into_response());
    }

    let updated = state
        .user_repository
        .update_password(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to update password: {}", e);
            ApiError::InternalServerError
        })?;

    if !updated {
        return Ok(Json(ApiResponse::fail("User not found")).into_response());
    }

    Ok(Json(ApiResponse::message("Password changed successfully")).into_response())
}

/// Return the authenticated user's record
pub async fn get_user_data(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let user = state.user_repository.find_by_id(auth.id).await.map_err(|e| {
        error!("Failed to load user: {}", e);
        ApiError::InternalServerError
    })?;

    match user {
        Some(user) => Ok(Json(ApiResponse::ok(user.public())).into_response()),
        None => Ok(Json(ApiResponse::fail("user not found")).into_response()),
    }
}

/// All listings, for the public browse view. Amenities strings are
/// normalized so the client always receives a valid JSON array.
pub async fn get_all_properties(
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let mut properties = state.property_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch properties: {}", e);
        ApiError::InternalServerError
    })?;

    if properties.is_empty() {
        return Ok(Json(ApiResponse::ok_with_message(
            properties,
            "No properties available",
        ))
        .into_response());
    }

    for property in &mut properties {
        property.amenities = normalize_amenities(Some(&property.amenities));
    }

    Ok(Json(ApiResponse::ok(properties)).into_response())
}

/// Place a booking request against a listing. The booking starts pending;
/// the listing's availability is not checked and competing pending bookings
/// are not detected.
pub async fn booking_handle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<BookingRequest>,
) -> Result<Response, ApiError> {
    if let Err(msg) = validation::validate_phone(&payload.phone) {
        return Ok(Json(ApiResponse::fail(msg)).into_response());
    }

    let property = state
        .property_repository
        .find_by_id(property_id)
        .await
        .map_err(|e| {
            error!("Failed to load property: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let booking = state
        .booking_repository
        .create(
            property_id,
            auth.id,
            property.owner_id,
            &payload.renter_name,
            &payload.phone,
        )
        .await
        .map_err(|e| {
            error!("Failed to create booking: {}", e);
            ApiError::InternalServerError
        })?;

    let address = excerpt(&property.address, 40);

    // Notify owner about the new booking request
    state
        .notification_repository
        .notify(
            property.owner_id,
            NotificationKind::Booking,
            "New Booking Request",
            &format!(
                "{} has requested to book your {} property at {}",
                payload.renter_name, property.property_type, address
            ),
            Some(booking.id),
        )
        .await;

    // Notify the renter that the request was submitted
    state
        .notification_repository
        .notify(
            auth.id,
            NotificationKind::Booking,
            "Booking Submitted",
            &format!(
                "Your booking request for {} property at {} has been submitted and is pending owner approval",
                property.property_type, address
            ),
            Some(booking.id),
        )
        .await;

    Ok(Json(ApiResponse::ok_with_message(
        booking,
        "Booking request submitted",
    ))
    .into_response())
}

/// Bookings placed by the authenticated renter
pub async fn get_all_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let bookings = state
        .booking_repository
        .for_renter(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch bookings: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::ok(bookings)).into_response())
}

/// Cancel a booking. The linked property's availability is left untouched.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let booking = state
        .booking_repository
        .cancel(booking_id)
        .await
        .map_err(|e| {
            error!("Failed to cancel booking: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    // Notify the owner about the cancellation; the property may be gone
    let property = state
        .property_repository
        .find_by_id(booking.property_id)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to load property for notification: {}", e);
            None
        });

    let (property_type, address) = match &property {
        Some(p) => (p.property_type.as_str(), excerpt(&p.address, 40)),
        None => ("", ""),
    };

    state
        .notification_repository
        .notify(
            booking.owner_id,
            NotificationKind::BookingStatus,
            "Booking Cancelled",
            &format!(
                "{} has cancelled their booking for your {} property at {}",
                booking.renter_name, property_type, address
            ),
            Some(booking.id),
        )
        .await;

    Ok(Json(ApiResponse::ok_with_message(
        booking,
        "Booking cancelled successfully",
    ))
    .into_response())
}

/// Submit a review. One review per (user, property), enforced only by this
/// existence check. The property's rating becomes the rounded mean of all
/// its reviews.
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Response, ApiError> {
    if !(1..=5).contains(&payload.rating) {
        return Ok(Json(ApiResponse::fail("Rating must be between 1 and 5")).into_response());
    }

    let already_reviewed = state
        .review_repository
        .exists_for(payload.property_id, auth.id)
        .await
        .map_err(|e| {
            error!("Failed to check existing review: {}", e);
            ApiError::InternalServerError
        })?;

    if already_reviewed {
        return Ok(
            Json(ApiResponse::fail("You have already reviewed this property")).into_response(),
        );
    }

    let user = state.user_repository.find_by_id(auth.id).await.map_err(|e| {
        error!("Failed to load user: {}", e);
        ApiError::InternalServerError
    })?;
    let user_name = user.map(|u| u.name).unwrap_or_else(|| "Anonymous".to_string());

    let property = state
        .property_repository
        .find_by_id(payload.property_id)
        .await
        .map_err(|e| {
            error!("Failed to load property: {}", e);
            ApiError::InternalServerError
        })?;

    let (property_address, property_type) = match &property {
        Some(p) => (p.address.clone(), p.property_type.clone()),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    let review = state
        .review_repository
        .create(&NewReview {
            property_id: payload.property_id,
            owner_id: payload.owner_id,
            user_id: auth.id,
            user_name: &user_name,
            booking_id: payload.booking_id,
            rating: payload.rating,
            body: &payload.review,
            property_address: &property_address,
            property_type: &property_type,
        })
        .await
        .map_err(|e| {
            error!("Failed to create review: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .notification_repository
        .notify(
            payload.owner_id,
            NotificationKind::Review,
            "New Review Received",
            &format!(
                "{} left a {}-star review on your {} property at {}",
                user_name,
                payload.rating,
                property_type,
                excerpt(&property_address, 40)
            ),
            Some(review.id),
        )
        .await;

    // Recompute the listing's average rating. Read-modify-write with no
    // isolation against concurrent submissions.
    let ratings = state
        .review_repository
        .ratings_for_property(payload.property_id)
        .await
        .map_err(|e| {
            error!("Failed to load ratings: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .property_repository
        .set_rating(payload.property_id, average_rating(&ratings))
        .await
        .map_err(|e| {
            error!("Failed to update property rating: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::message("Review submitted successfully")).into_response())
}

/// Reviews for a property, public
pub async fn get_property_reviews(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let reviews = state
        .review_repository
        .for_property(property_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch reviews: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::ok(reviews)).into_response())
}
