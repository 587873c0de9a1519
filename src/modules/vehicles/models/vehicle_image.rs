use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Image record for a vehicle; the file itself lives outside the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleImage {
    pub id: i64,
    pub vehicle_id: i64,
    pub image_url: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Body of POST /api/vehicles/{id}/images
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleImageRequest {
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl CreateVehicleImageRequest {
    pub fn validate(&self) -> Result<()> {
        let url = self.image_url.trim();
        if url.is_empty() {
            return Err(AppError::invalid_argument("Image URL cannot be empty"));
        }
        if url.len() > 1024 {
            return Err(AppError::invalid_argument(
                "Image URL cannot exceed 1024 characters",
            ));
        }
        Ok(())
    }
}
