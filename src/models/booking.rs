use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Delivered")]
    Delivered,
    #[serde(alias = "Cancelled")]
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Delivered => write!(f, "Delivered"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Document of the "booking" collection.
///
/// `test_name`, `price` and `date` are copied from the test when the booking
/// is made and never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub user_id: String,
    pub email: String,
    pub test_id: String,
    pub test_name: String,
    pub price: f64,
    pub date: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: String,
    pub email: String,
    pub test_id: String,
    /// Appointment date; defaults to the test's date, then to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    pub test_result_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub email: Option<String>,
}
