use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::vehicle_image::VehicleImage;
use crate::core::{AppError, Money, Result};

/// Availability state of a vehicle
///
/// `available -> booked` on schedule confirmation, `booked -> available` on
/// cancellation, `-> sold` on full payment and `-> on_installment` when an
/// installment plan is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Booked,
    Sold,
    OnInstallment,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Sold => "sold",
            Self::OnInstallment => "on_installment",
        }
    }
}

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Available
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "sold" => Ok(Self::Sold),
            "on_installment" => Ok(Self::OnInstallment),
            _ => Err(format!("Invalid vehicle status: {}", s)),
        }
    }
}

impl TryFrom<String> for VehicleStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A vehicle offered for rental or sale
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub price: Decimal,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Joined from vehicle_images on detail reads
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<VehicleImage>,
}

impl Vehicle {
    /// Whether a new booking or confirmation may reserve this vehicle
    pub fn ensure_available(&self) -> Result<()> {
        if self.status != VehicleStatus::Available {
            return Err(AppError::invalid_state(format!(
                "Vehicle {} is not available (status: {})",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Cancelling a confirmed booking only frees a vehicle that is still held by it
    pub fn is_releasable(&self) -> bool {
        self.status == VehicleStatus::Booked
    }
}

/// Body of POST /api/vehicles
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
}

/// Body of PUT /api/vehicles/{id}
pub type UpdateVehicleRequest = CreateVehicleRequest;

impl CreateVehicleRequest {
    pub fn validate(&self) -> Result<()> {
        if self.make.trim().is_empty() {
            return Err(AppError::invalid_argument("Make cannot be empty"));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::invalid_argument("Model cannot be empty"));
        }

        if self.vin.trim().is_empty() {
            return Err(AppError::invalid_argument("VIN cannot be empty"));
        }

        if self.vin.len() > 50 {
            return Err(AppError::invalid_argument("VIN cannot exceed 50 characters"));
        }

        let next_year = Utc::now().year() + 1;
        if self.year < 1886 || self.year > next_year {
            return Err(AppError::invalid_argument(format!(
                "Year must be between 1886 and {}, got {}",
                next_year, self.year
            )));
        }

        Money::validate("Price", self.price)?;

        Ok(())
    }
}
