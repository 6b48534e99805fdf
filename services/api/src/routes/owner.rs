//! Owner-facing routes: listings, bookings, reviews
//!
//! The read endpoints here fail soft: a database error answers HTTP 200
//! with an empty list so the dashboard stays usable offline.

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        AdType, ApiResponse, BookedProperty, BookingStatus, BookingStatusRequest, NewProperty,
        NotificationKind, UpdateProperty, excerpt,
        property::{PropertyMedia, PropertyVideo, normalize_amenities},
    },
    state::AppState,
    uploads,
};

/// Create the router for owner-facing endpoints
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/postproperty",
            post(post_property).layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES)),
        )
        .route("/getallproperties", get(get_all_properties))
        .route("/deleteproperty/:propertyid", delete(delete_property))
        .route("/updateproperty/:propertyid", patch(update_property))
        .route("/getallbookings", get(get_all_bookings))
        .route("/handlebookingstatus", post(handle_booking_status))
        .route("/getbookedproperties", get(get_booked_properties))
        .route("/getreviews", get(get_owner_reviews))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/incrementview/:propertyid", patch(increment_view))
        .merge(protected)
        .with_state(state)
}

#[derive(Default)]
struct PropertyForm {
    property_type: Option<String>,
    ad_type: Option<String>,
    address: Option<String>,
    owner_contact: Option<String>,
    amount: i64,
    bedrooms: i32,
    bathrooms: i32,
    area: Option<String>,
    parking: bool,
    furnished: Option<String>,
    amenities: Option<String>,
    additional_info: Option<String>,
    images: Vec<PropertyMedia>,
    video: Option<PropertyVideo>,
}

/// Create a listing from a multipart form: text fields plus up to ten
/// images and one optional video, validated by extension only.
pub async fn post_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = PropertyForm {
        bedrooms: 1,
        bathrooms: 1,
        ..Default::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "propertyImages" => {
                if form.images.len() >= uploads::MAX_IMAGES {
                    return Err(ApiError::BadRequest(format!(
                        "At most {} images are allowed",
                        uploads::MAX_IMAGES
                    )));
                }
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !uploads::is_allowed_image(&file_name) {
                    return Err(ApiError::BadRequest(
                        "Only image files (jpeg, jpg, png, gif, webp) are allowed".to_string(),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                let stored = uploads::save_image(&state.upload_dir, &file_name, &bytes)
                    .await
                    .map_err(|e| {
                        error!("Failed to store image: {}", e);
                        ApiError::InternalServerError
                    })?;
                form.images.push(stored);
            }
            "propertyVideo" => {
                if form.video.is_some() {
                    return Err(ApiError::BadRequest("Only one video is allowed".to_string()));
                }
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !uploads::is_allowed_video(&file_name) {
                    return Err(ApiError::BadRequest(
                        "Only video files (mp4, mov, webm, avi, mkv) are allowed".to_string(),
                    ));
                }
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                let stored = uploads::save_video(&state.upload_dir, &file_name, &mime_type, &bytes)
                    .await
                    .map_err(|e| {
                        error!("Failed to store video: {}", e);
                        ApiError::InternalServerError
                    })?;
                form.video = Some(stored);
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid field: {}", e)))?;
                match name.as_str() {
                    "propertyType" => form.property_type = Some(value),
                    "propertyAdType" => form.ad_type = Some(value),
                    "propertyAddress" => form.address = Some(value),
                    "ownerContact" => form.owner_contact = Some(value),
                    "propertyAmt" => form.amount = value.parse().unwrap_or(0),
                    "bedrooms" => form.bedrooms = value.parse().unwrap_or(1),
                    "bathrooms" => form.bathrooms = value.parse().unwrap_or(1),
                    "area" => form.area = Some(value),
                    "parking" => form.parking = value == "true" || value == "1",
                    "furnished" => form.furnished = Some(value),
                    "amenities" => form.amenities = Some(value),
                    "additionalInfo" => form.additional_info = Some(value),
                    _ => {}
                }
            }
        }
    }

    let property_type = form
        .property_type
        .ok_or_else(|| ApiError::BadRequest("Please provide a Property Type".to_string()))?;
    let ad_type = form
        .ad_type
        .as_deref()
        .and_then(AdType::parse)
        .ok_or_else(|| ApiError::BadRequest("Please provide a Property Ad Type".to_string()))?;
    let address = form
        .address
        .ok_or_else(|| ApiError::BadRequest("Please provide an Address".to_string()))?;
    let owner_contact = form
        .owner_contact
        .ok_or_else(|| ApiError::BadRequest("Please provide owner contact".to_string()))?;

    let owner = state
        .user_repository
        .find_by_id(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to load owner: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let new_property = NewProperty {
        owner_id: owner.id,
        owner_name: owner.name,
        property_type,
        ad_type,
        address,
        owner_contact,
        amount: form.amount,
        bedrooms: form.bedrooms,
        bathrooms: form.bathrooms,
        area: form.area,
        parking: form.parking,
        furnished: form.furnished.unwrap_or_else(|| "unfurnished".to_string()),
        amenities: normalize_amenities(form.amenities.as_deref()),
        additional_info: form.additional_info,
        images: form.images,
        video: form.video,
    };

    let property = state
        .property_repository
        .create(&new_property)
        .await
        .map_err(|e| {
            error!("Failed to create property: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .notification_repository
        .notify(
            property.owner_id,
            NotificationKind::Property,
            "Property Listed Successfully",
            &format!(
                "Your {} property at {} has been successfully listed and is now visible to renters",
                property.property_type,
                excerpt(&property.address, 40)
            ),
            Some(property.id),
        )
        .await;

    Ok(Json(ApiResponse::message("New Property has been stored")).into_response())
}

/// The owner's listings. Fails soft on database errors.
pub async fn get_all_properties(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.property_repository.get_by_owner(auth.id).await {
        Ok(properties) => Json(ApiResponse::ok(properties)).into_response(),
        Err(e) => {
            error!("Failed to fetch owner properties: {}", e);
            Json(ApiResponse::ok_with_message(
                Vec::<crate::models::Property>::new(),
                "Database error - returning empty properties list",
            ))
            .into_response()
        }
    }
}

/// Delete a listing
pub async fn delete_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state
        .property_repository
        .delete(property_id)
        .await
        .map_err(|e| {
            error!("Failed to delete property: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::message("The property is deleted")).into_response())
}

/// Partially update a listing
pub async fn update_property(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<UpdateProperty>,
) -> Result<Response, ApiError> {
    let updated = state
        .property_repository
        .update(property_id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update property: {}", e);
            ApiError::InternalServerError
        })?;

    if updated.is_none() {
        return Err(ApiError::NotFound("Property not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Property updated successfully")).into_response())
}

/// Bookings against the owner's listings. Fails soft on database errors.
pub async fn get_all_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.booking_repository.for_owner(auth.id).await {
        Ok(bookings) => Json(ApiResponse::ok(bookings)).into_response(),
        Err(e) => {
            error!("Failed to fetch owner bookings: {}", e);
            Json(ApiResponse::ok_with_message(
                Vec::<crate::models::Booking>::new(),
                "Database error - returning empty bookings list",
            ))
            .into_response()
        }
    }
}

/// Owner decision on a booking request: accept (booked) or revoke back to
/// pending. The linked property's availability follows the status.
pub async fn handle_booking_status(
    State(state): State<AppState>,
    Json(payload): Json<BookingStatusRequest>,
) -> Result<Response, ApiError> {
    let booking = state
        .booking_repository
        .set_status_with_availability(payload.booking_id, payload.property_id, payload.status)
        .await
        .map_err(|e| {
            error!("Failed to update booking status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    // The property may have been deleted; notify with what we have
    let property = state
        .property_repository
        .find_by_id(payload.property_id)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to load property for notification: {}", e);
            None
        });

    let (property_type, address) = match &property {
        Some(p) => (p.property_type.as_str(), excerpt(&p.address, 40)),
        None => ("", ""),
    };

    let status_text = if payload.status == BookingStatus::Booked {
        "accepted"
    } else {
        "revoked"
    };
    let title = if payload.status == BookingStatus::Booked {
        "Booking Accepted"
    } else {
        "Booking Revoked"
    };

    state
        .notification_repository
        .notify(
            booking.renter_id,
            NotificationKind::BookingStatus,
            title,
            &format!(
                "Your booking for {} property at {} has been {} by the owner",
                property_type, address, status_text
            ),
            Some(booking.id),
        )
        .await;

    Ok(Json(ApiResponse::message(format!(
        "changed the status of property to {}",
        payload.status.as_str()
    )))
    .into_response())
}

/// Booked listings with tenant details. Fails soft on database errors.
pub async fn get_booked_properties(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    let bookings = match state.booking_repository.booked_for_owner(auth.id).await {
        Ok(bookings) => bookings,
        Err(e) => {
            error!("Failed to fetch booked properties: {}", e);
            return Json(ApiResponse::ok_with_message(
                Vec::<BookedProperty>::new(),
                "Error fetching booked properties",
            ))
            .into_response();
        }
    };

    let mut booked = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let property = state
            .property_repository
            .find_by_id(booking.property_id)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to load property {}: {}", booking.property_id, e);
                None
            });

        let entry = match property {
            Some(p) => BookedProperty {
                booking_id: booking.id,
                tenant_name: booking.renter_name,
                tenant_phone: booking.phone,
                booking_status: booking.status,
                property_type: p.property_type,
                property_address: p.address,
                property_amt: p.amount,
                bedrooms: p.bedrooms,
                bathrooms: p.bathrooms,
                furnished: p.furnished,
                property_ad_type: p.ad_type.as_str().to_string(),
                owner_name: p.owner_name,
                booked_date: booking.created_at,
            },
            None => BookedProperty {
                booking_id: booking.id,
                tenant_name: booking.renter_name,
                tenant_phone: booking.phone,
                booking_status: booking.status,
                property_type: "N/A".to_string(),
                property_address: "N/A".to_string(),
                property_amt: 0,
                bedrooms: 0,
                bathrooms: 0,
                furnished: "N/A".to_string(),
                property_ad_type: "N/A".to_string(),
                owner_name: "N/A".to_string(),
                booked_date: booking.created_at,
            },
        };
        booked.push(entry);
    }

    Json(ApiResponse::ok(booked)).into_response()
}

/// Reviews across the owner's listings. Fails soft on database errors.
pub async fn get_owner_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.review_repository.for_owner(auth.id).await {
        Ok(reviews) => Json(ApiResponse::ok(reviews)).into_response(),
        Err(e) => {
            error!("Failed to fetch owner reviews: {}", e);
            Json(ApiResponse::ok_with_message(
                Vec::<crate::models::Review>::new(),
                "Error fetching reviews",
            ))
            .into_response()
        }
    }
}

/// Bump a listing's view counter. Public: fired by the browse page.
pub async fn increment_view(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state
        .property_repository
        .increment_views(property_id)
        .await
        .map_err(|e| {
            error!("Failed to increment views: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({ "success": true })).into_response())
}
