//! Repositories for database operations

pub mod booking;
pub mod chat;
pub mod notification;
pub mod payment;
pub mod property;
pub mod recent_view;
pub mod review;
pub mod user;

pub use booking::BookingRepository;
pub use chat::ChatRepository;
pub use notification::NotificationRepository;
pub use payment::PaymentRepository;
pub use property::PropertyRepository;
pub use recent_view::RecentViewRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
