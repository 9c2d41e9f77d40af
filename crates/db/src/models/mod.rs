pub mod availability;
pub mod booking;
pub mod notification;
pub mod reservation_type;
pub mod setting;
pub mod urgent_request;
pub mod user;
