use serde::Serialize;

use super::booking::Booking;
use crate::modules::agreements::models::Agreement;
use crate::modules::payments::models::Payment;
use crate::modules::users::models::UserResponse;
use crate::modules::vehicles::models::Vehicle;

/// Booking joined with its customer, vehicle, agreement and payments
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<UserResponse>,
    pub vehicle: Option<Vehicle>,
    pub agreement: Option<Agreement>,
    pub payments: Vec<Payment>,
}
