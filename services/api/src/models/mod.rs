//! Domain models and request/response payloads

pub mod booking;
pub mod chat;
pub mod notification;
pub mod payment;
pub mod property;
pub mod recent_view;
pub mod response;
pub mod review;
pub mod user;

// Re-export for convenience
pub use booking::{Booking, BookingRequest, BookingStatus, BookingStatusRequest, BookedProperty};
pub use chat::{ChatMessage, Conversation, LastMessage, SendMessageRequest};
pub use notification::{Notification, NotificationKind, excerpt};
pub use payment::{CreateOrderRequest, OrderDetails, Payment, PaymentStatus, VerifyPaymentRequest};
pub use property::{
    AdType, Availability, NewProperty, Property, PropertyMedia, PropertyVideo, UpdateProperty,
};
pub use recent_view::{RecentView, RecentViewEntry};
pub use response::ApiResponse;
pub use review::{Review, SubmitReviewRequest};
pub use user::{
    ForgotPasswordRequest, GrantStatus, GrantStatusRequest, LoginRequest, NewUser, PublicUser,
    RegisterRequest, Role, User,
};
