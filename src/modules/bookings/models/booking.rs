use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Booking lifecycle
///
/// ```text
/// pending --confirm--> confirmed
/// pending --decline--> reschedule_requested
/// any     --cancel---> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    RescheduleRequested,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::RescheduleRequested => "reschedule_requested",
        }
    }

    /// The status endpoint only cancels
    pub fn ensure_cancellation_target(target: BookingStatus) -> Result<()> {
        if target != BookingStatus::Cancelled {
            return Err(AppError::invalid_argument(
                "This endpoint can only be used to cancel a booking",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "reschedule_requested" => Ok(Self::RescheduleRequested),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A customer's request to view or buy a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_id: i64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub proposed_datetime: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Appointment time a confirmation would schedule
    pub fn confirmation_time(&self) -> Result<DateTime<Utc>> {
        let proposed = self.proposed_datetime.ok_or_else(|| {
            AppError::invalid_state("Customer has not proposed a time for this booking")
        })?;

        if self.status != BookingStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Only pending bookings can be confirmed (status: {})",
                self.status
            )));
        }

        Ok(proposed)
    }

    /// Staff declines the proposed time and asks the customer to reschedule
    pub fn decline(&mut self, reason: &str) -> Result<()> {
        if self.status != BookingStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Only pending bookings can be declined (status: {})",
                self.status
            )));
        }

        self.status = BookingStatus::RescheduleRequested;
        self.proposed_datetime = None;
        self.decline_reason = Some(reason.to_string());

        Ok(())
    }

    /// Cancelling a confirmed booking may hand its vehicle back to the pool
    pub fn holds_vehicle(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn ensure_agreement_allowed(&self) -> Result<()> {
        if self.status != BookingStatus::Confirmed {
            return Err(AppError::invalid_argument(format!(
                "Agreement can only be created for confirmed bookings (booking {} is {})",
                self.id, self.status
            )));
        }
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: i64,
    /// RFC 3339 timestamp
    pub proposed_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmScheduleRequest {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeclineBookingRequest {
    pub reason: String,
}

impl DeclineBookingRequest {
    pub fn validate(&self) -> Result<()> {
        if self.reason.trim().is_empty() {
            return Err(AppError::invalid_argument("Decline reason is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

impl UpdateBookingStatusRequest {
    /// Parses and checks the target before any lookup happens
    pub fn target(&self) -> Result<BookingStatus> {
        let status: BookingStatus = self
            .status
            .parse()
            .map_err(|e: String| AppError::invalid_argument(e))?;
        BookingStatus::ensure_cancellation_target(status)?;
        Ok(status)
    }
}
