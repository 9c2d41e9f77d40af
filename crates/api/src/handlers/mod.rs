pub mod availability;
pub mod booking;
pub mod notification;
pub mod reservation_type;
pub mod settings;
pub mod urgent_request;
