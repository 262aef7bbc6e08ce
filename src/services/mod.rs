pub mod banner_service;
pub mod booking_service;
pub mod lab_test_service;
pub mod recommendation_service;
pub mod records;
pub mod session_service;
pub mod user_service;

pub use session_service::{Claims, SessionGate};
