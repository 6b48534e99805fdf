//! Payment ledger routes
//!
//! Orders are recorded locally and "verified" by flipping the record to
//! paid with a fabricated payment reference. No gateway is called.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{
        ApiResponse, CreateOrderRequest, NotificationKind, OrderDetails, Payment,
        VerifyPaymentRequest, excerpt,
    },
    repositories::payment::NewPayment,
    state::AppState,
};

/// Fallback rent amount when the listing no longer exists
const FALLBACK_RENT: i64 = 5000;

/// Response for order creation
#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: OrderDetails,
    pub payment: Payment,
}

/// Response for payment verification
#[derive(Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment: Payment,
}

/// Response for the per-booking payment check
#[derive(Serialize)]
pub struct PaymentCheckResponse {
    pub success: bool,
    pub paid: bool,
    pub payment: Option<Payment>,
}

/// Create the router for payment endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify", post(verify_payment))
        .route("/history", get(payment_history))
        .route("/check/:bookingid", get(check_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// `order_<hex>` / `pay_<hex>` identifiers, 12 random bytes
fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}_{}", prefix, hex)
}

/// Open a payment order for a booking
pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    let booking = state
        .booking_repository
        .find_by_id(payload.booking_id)
        .await
        .map_err(|e| {
            error!("Failed to load booking: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if booking.renter_id != auth.id {
        return Err(ApiError::Forbidden);
    }

    // Check-then-insert: a concurrent order for the same booking can slip
    // through between these two statements.
    let existing = state
        .payment_repository
        .find_paid_for_booking(payload.booking_id)
        .await
        .map_err(|e| {
            error!("Failed to check payments: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::BadRequest(
            "Rent already paid for this booking".to_string(),
        ));
    }

    let property = state
        .property_repository
        .find_by_id(booking.property_id)
        .await
        .map_err(|e| {
            error!("Failed to load property: {}", e);
            ApiError::InternalServerError
        })?;

    let (amount, property_address) = match &property {
        Some(p) => (p.amount, p.address.clone()),
        None => (FALLBACK_RENT, String::new()),
    };

    let order_id = generate_id("order");
    let receipt = format!("rent_{}_{}", payload.booking_id, Utc::now().timestamp_millis());

    let payment = state
        .payment_repository
        .create(&NewPayment {
            booking_id: payload.booking_id,
            property_id: booking.property_id,
            payer_id: auth.id,
            owner_id: booking.owner_id,
            amount,
            order_id: &order_id,
            payer_name: &booking.renter_name,
            property_address: &property_address,
        })
        .await
        .map_err(|e| {
            error!("Failed to create payment order: {}", e);
            ApiError::InternalServerError
        })?;

    let response = CreateOrderResponse {
        success: true,
        order: OrderDetails {
            id: order_id,
            // minor units
            amount: amount * 100,
            currency: payment.currency.clone(),
            receipt,
        },
        payment,
    };

    Ok(Json(response).into_response())
}

/// Settle an order: fabricate a payment reference, flip the record to paid
/// and notify both sides.
pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Response, ApiError> {
    let payment_ref = generate_id("pay");

    let payment = state
        .payment_repository
        .mark_paid(&payload.order_id, &payment_ref)
        .await
        .map_err(|e| {
            error!("Failed to verify payment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Payment record not found".to_string()))?;

    let address = excerpt(&payment.property_address, 40);

    // Notify the owner about the received rent
    state
        .notification_repository
        .notify(
            payment.owner_id,
            NotificationKind::Booking,
            "Payment Received",
            &format!(
                "{} has paid ₹{} rent for property at {}",
                payment.payer_name, payment.amount, address
            ),
            Some(payment.booking_id),
        )
        .await;

    // And the payer about the successful payment
    let ref_tail = &payment_ref[payment_ref.len() - 8..];
    state
        .notification_repository
        .notify(
            auth.id,
            NotificationKind::Booking,
            "Payment Successful",
            &format!(
                "Your rent payment of ₹{} was successful. Transaction ID: {}",
                payment.amount, ref_tail
            ),
            Some(payment.booking_id),
        )
        .await;

    let response = VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        payment,
    };

    Ok(Json(response).into_response())
}

/// Settled payments where the caller is payer or owner. Fails soft.
pub async fn payment_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.payment_repository.history_for_user(auth.id).await {
        Ok(payments) => Json(ApiResponse::ok(payments)).into_response(),
        Err(e) => {
            error!("Failed to fetch payment history: {}", e);
            Json(ApiResponse::ok(Vec::<Payment>::new())).into_response()
        }
    }
}

/// Whether a booking has been paid for. Fails soft to "not paid".
pub async fn check_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    match state.payment_repository.find_paid_for_booking(booking_id).await {
        Ok(payment) => Json(PaymentCheckResponse {
            success: true,
            paid: payment.is_some(),
            payment,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to check payment status: {}", e);
            Json(PaymentCheckResponse {
                success: true,
                paid: false,
                payment: None,
            })
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_hex() {
        let id = generate_id("order");
        let (prefix, hex) = id.split_once('_').unwrap();
        assert_eq!(prefix, "order");
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_id("pay"), generate_id("pay"));
    }
}
