//! Application state shared across handlers

use sqlx::PgPool;
use std::path::PathBuf;

use crate::jwt::JwtService;
use crate::rate_limiter::RateLimiter;
use crate::repositories::{
    BookingRepository, ChatRepository, NotificationRepository, PaymentRepository,
    PropertyRepository, RecentViewRepository, ReviewRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub rate_limiter: RateLimiter,
    pub upload_dir: PathBuf,
    pub user_repository: UserRepository,
    pub property_repository: PropertyRepository,
    pub booking_repository: BookingRepository,
    pub payment_repository: PaymentRepository,
    pub notification_repository: NotificationRepository,
    pub review_repository: ReviewRepository,
    pub chat_repository: ChatRepository,
    pub recent_view_repository: RecentViewRepository,
}

impl AppState {
    /// Wire up all repositories over one pool
    pub fn new(
        pool: PgPool,
        jwt_service: JwtService,
        rate_limiter: RateLimiter,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            property_repository: PropertyRepository::new(pool.clone()),
            booking_repository: BookingRepository::new(pool.clone()),
            payment_repository: PaymentRepository::new(pool.clone()),
            notification_repository: NotificationRepository::new(pool.clone()),
            review_repository: ReviewRepository::new(pool.clone()),
            chat_repository: ChatRepository::new(pool.clone()),
            recent_view_repository: RecentViewRepository::new(pool.clone()),
            db_pool: pool,
            jwt_service,
            rate_limiter,
            upload_dir,
        }
    }
}
