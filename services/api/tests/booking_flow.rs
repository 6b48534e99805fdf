//! Integration tests for the booking lifecycle and its side effects
//!
//! These tests need a running PostgreSQL instance (DATABASE_URL) and are
//! ignored by default:
//!
//! ```sh
//! cargo test -p api -- --ignored
//! ```

use api::models::booking::BookingStatus;
use api::models::notification::NotificationKind;
use api::models::property::{AdType, Availability, NewProperty};
use api::models::review::average_rating;
use api::models::user::{GrantStatus, NewUser, Role, User};
use api::repositories::payment::NewPayment;
use api::repositories::review::NewReview;
use api::repositories::{
    BookingRepository, NotificationRepository, PaymentRepository, PropertyRepository,
    ReviewRepository, UserRepository,
};
use common::database::{DatabaseConfig, init_pool};
use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool
}

async fn create_user(pool: &PgPool, role: Role) -> User {
    let repo = UserRepository::new(pool.clone());
    repo.create(&NewUser {
        name: format!("{:?} User", role),
        email: format!("{}@example.com", Uuid::new_v4()),
        password: "Str0ng-passw0rd".to_string(),
        role,
        grant_status: GrantStatus::Granted,
    })
    .await
    .expect("create user")
}

async fn create_property(pool: &PgPool, owner: &User) -> api::models::Property {
    let repo = PropertyRepository::new(pool.clone());
    repo.create(&NewProperty {
        owner_id: owner.id,
        owner_name: owner.name.clone(),
        property_type: "flat".to_string(),
        ad_type: AdType::Rent,
        address: "12 Hill Road, Bandra West, Mumbai".to_string(),
        owner_contact: "9876543210".to_string(),
        amount: 25000,
        bedrooms: 2,
        bathrooms: 1,
        area: Some("900 sqft".to_string()),
        parking: true,
        furnished: "semi-furnished".to_string(),
        amenities: r#"["wifi","lift"]"#.to_string(),
        additional_info: None,
        images: vec![],
        video: None,
    })
    .await
    .expect("create property")
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn booking_starts_pending_and_notifies_both_sides() {
    let pool = test_pool().await;
    let owner = create_user(&pool, Role::Owner).await;
    let renter = create_user(&pool, Role::Renter).await;
    let property = create_property(&pool, &owner).await;

    let bookings = BookingRepository::new(pool.clone());
    let notifications = NotificationRepository::new(pool.clone());

    let booking = bookings
        .create(property.id, renter.id, owner.id, &renter.name, "9876543210")
        .await
        .expect("create booking");

    assert_eq!(booking.status, BookingStatus::Pending);

    // Exactly two notifications: one for the owner, one for the renter
    notifications
        .notify(
            owner.id,
            NotificationKind::Booking,
            "New Booking Request",
            "request",
            Some(booking.id),
        )
        .await;
    notifications
        .notify(
            renter.id,
            NotificationKind::Booking,
            "Booking Submitted",
            "submitted",
            Some(booking.id),
        )
        .await;

    let owner_inbox = notifications.for_user(owner.id).await.expect("owner inbox");
    let renter_inbox = notifications
        .for_user(renter.id)
        .await
        .expect("renter inbox");
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(renter_inbox.len(), 1);

    let listed = bookings.for_owner(owner.id).await.expect("owner bookings");
    assert!(listed.iter().any(|b| b.id == booking.id));
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn accepting_a_booking_flips_availability_and_revoking_restores_it() {
    let pool = test_pool().await;
    let owner = create_user(&pool, Role::Owner).await;
    let renter = create_user(&pool, Role::Renter).await;
    let property = create_property(&pool, &owner).await;

    let bookings = BookingRepository::new(pool.clone());
    let properties = PropertyRepository::new(pool.clone());

    let booking = bookings
        .create(property.id, renter.id, owner.id, &renter.name, "")
        .await
        .expect("create booking");

    let updated = bookings
        .set_status_with_availability(booking.id, property.id, BookingStatus::Booked)
        .await
        .expect("set status")
        .expect("booking exists");
    assert_eq!(updated.status, BookingStatus::Booked);

    let property_now = properties
        .find_by_id(property.id)
        .await
        .expect("load property")
        .expect("property exists");
    assert_eq!(property_now.availability, Availability::Unavailable);

    // Revoke back to pending: availability is restored
    bookings
        .set_status_with_availability(booking.id, property.id, BookingStatus::Pending)
        .await
        .expect("set status")
        .expect("booking exists");

    let property_now = properties
        .find_by_id(property.id)
        .await
        .expect("load property")
        .expect("property exists");
    assert_eq!(property_now.availability, Availability::Available);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn cancelling_never_touches_availability() {
    let pool = test_pool().await;
    let owner = create_user(&pool, Role::Owner).await;
    let renter = create_user(&pool, Role::Renter).await;
    let property = create_property(&pool, &owner).await;

    let bookings = BookingRepository::new(pool.clone());
    let properties = PropertyRepository::new(pool.clone());

    let booking = bookings
        .create(property.id, renter.id, owner.id, &renter.name, "")
        .await
        .expect("create booking");

    bookings
        .set_status_with_availability(booking.id, property.id, BookingStatus::Booked)
        .await
        .expect("set status");

    let cancelled = bookings
        .cancel(booking.id)
        .await
        .expect("cancel")
        .expect("booking exists");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // The property stays Unavailable: cancellation does not restore it
    let property_now = properties
        .find_by_id(property.id)
        .await
        .expect("load property")
        .expect("property exists");
    assert_eq!(property_now.availability, Availability::Unavailable);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn a_paid_booking_is_detected_before_a_new_order() {
    let pool = test_pool().await;
    let owner = create_user(&pool, Role::Owner).await;
    let renter = create_user(&pool, Role::Renter).await;
    let property = create_property(&pool, &owner).await;

    let bookings = BookingRepository::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());

    let booking = bookings
        .create(property.id, renter.id, owner.id, &renter.name, "")
        .await
        .expect("create booking");

    assert!(
        payments
            .find_paid_for_booking(booking.id)
            .await
            .expect("check")
            .is_none()
    );

    let payment = payments
        .create(&NewPayment {
            booking_id: booking.id,
            property_id: property.id,
            payer_id: renter.id,
            owner_id: owner.id,
            amount: property.amount,
            order_id: "order_deadbeefdeadbeefdeadbeef",
            payer_name: &renter.name,
            property_address: &property.address,
        })
        .await
        .expect("create order");

    let paid = payments
        .mark_paid(&payment.order_id, "pay_cafebabecafebabecafebabe")
        .await
        .expect("mark paid")
        .expect("order exists");
    assert_eq!(paid.payment_ref.as_deref(), Some("pay_cafebabecafebabecafebabe"));

    // A second order attempt now finds the settled payment
    assert!(
        payments
            .find_paid_for_booking(booking.id)
            .await
            .expect("check")
            .is_some()
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn review_uniqueness_check_and_rating_mean() {
    let pool = test_pool().await;
    let owner = create_user(&pool, Role::Owner).await;
    let renter_a = create_user(&pool, Role::Renter).await;
    let renter_b = create_user(&pool, Role::Renter).await;
    let property = create_property(&pool, &owner).await;

    let reviews = ReviewRepository::new(pool.clone());
    let properties = PropertyRepository::new(pool.clone());

    assert!(
        !reviews
            .exists_for(property.id, renter_a.id)
            .await
            .expect("exists check")
    );

    for (renter, rating) in [(&renter_a, 4), (&renter_b, 5)] {
        reviews
            .create(&NewReview {
                property_id: property.id,
                owner_id: owner.id,
                user_id: renter.id,
                user_name: &renter.name,
                booking_id: None,
                rating,
                body: "solid place",
                property_address: &property.address,
                property_type: &property.property_type,
            })
            .await
            .expect("create review");
    }

    // The duplicate check now fires for renter A
    assert!(
        reviews
            .exists_for(property.id, renter_a.id)
            .await
            .expect("exists check")
    );

    let ratings = reviews
        .ratings_for_property(property.id)
        .await
        .expect("ratings");
    properties
        .set_rating(property.id, average_rating(&ratings))
        .await
        .expect("set rating");

    let property_now = properties
        .find_by_id(property.id)
        .await
        .expect("load property")
        .expect("property exists");
    assert_eq!(property_now.rating, 4.5);
}
