//! Repository layer: one stateless struct per table.

pub mod availability_repo;
pub mod booking_repo;
pub mod notification_repo;
pub mod reservation_type_repo;
pub mod setting_repo;
pub mod urgent_request_repo;
pub mod user_repo;

pub use availability_repo::AvailabilityRepo;
pub use booking_repo::BookingRepo;
pub use notification_repo::NotificationRepo;
pub use reservation_type_repo::ReservationTypeRepo;
pub use setting_repo::SettingRepo;
pub use urgent_request_repo::UrgentRequestRepo;
pub use user_repo::UserRepo;
