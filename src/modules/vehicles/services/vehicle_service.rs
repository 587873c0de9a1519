use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::vehicles::models::{
    CreateVehicleImageRequest, CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleImage,
};
use crate::modules::vehicles::repositories::{VehicleImageRepository, VehicleRepository};

/// Catalogue operations for vehicles and their image records
pub struct VehicleService {
    pool: MySqlPool,
    vehicle_repo: VehicleRepository,
    image_repo: VehicleImageRepository,
}

impl VehicleService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            vehicle_repo: VehicleRepository::new(pool.clone()),
            image_repo: VehicleImageRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create_vehicle(&self, request: CreateVehicleRequest) -> Result<Vehicle> {
        request.validate()?;

        let vehicle = self.vehicle_repo.create(&request).await?;

        tracing::info!(vehicle_id = vehicle.id, vin = %vehicle.vin, "Vehicle created");

        Ok(vehicle)
    }

    pub async fn list_vehicles(&self, limit: i64, offset: i64) -> Result<Vec<Vehicle>> {
        if limit <= 0 || limit > 100 {
            return Err(AppError::invalid_argument("Limit must be between 1 and 100"));
        }
        if offset < 0 {
            return Err(AppError::invalid_argument("Offset cannot be negative"));
        }

        self.vehicle_repo.list(limit, offset).await
    }

    /// Vehicle with its live image records
    pub async fn get_vehicle(&self, id: i64) -> Result<Vehicle> {
        let mut vehicle = self
            .vehicle_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {} not found", id)))?;

        vehicle.images = self.image_repo.list_by_vehicle(id).await?;

        Ok(vehicle)
    }

    pub async fn update_vehicle(&self, id: i64, request: UpdateVehicleRequest) -> Result<Vehicle> {
        request.validate()?;

        self.vehicle_repo.update(id, &request).await?;

        tracing::info!(vehicle_id = id, "Vehicle updated");

        self.get_vehicle(id).await
    }

    pub async fn delete_vehicle(&self, id: i64) -> Result<()> {
        self.vehicle_repo.soft_delete(id).await?;

        tracing::info!(vehicle_id = id, "Vehicle deleted");

        Ok(())
    }

    /// Adds an image record; a primary image demotes the current primary in the same transaction
    pub async fn add_image(
        &self,
        vehicle_id: i64,
        request: CreateVehicleImageRequest,
    ) -> Result<VehicleImage> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        self.vehicle_repo
            .find_by_id_for_update(&mut tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {} not found", vehicle_id)))?;

        if request.is_primary {
            self.image_repo
                .clear_primary_with_tx(&mut tx, vehicle_id)
                .await?;
        }

        let image_id = self
            .image_repo
            .create_with_tx(&mut tx, vehicle_id, request.image_url.trim(), request.is_primary)
            .await?;

        tx.commit().await?;

        tracing::info!(vehicle_id, image_id, primary = request.is_primary, "Vehicle image added");

        self.image_repo
            .find_by_id(image_id)
            .await?
            .ok_or_else(|| AppError::internal("Vehicle image vanished after insert"))
    }

    pub async fn delete_image(&self, image_id: i64) -> Result<()> {
        self.image_repo.soft_delete(image_id).await?;

        tracing::info!(image_id, "Vehicle image deleted");

        Ok(())
    }

    /// Makes one image the vehicle's only primary image
    pub async fn set_primary_image(&self, image_id: i64) -> Result<VehicleImage> {
        let image = self
            .image_repo
            .find_by_id(image_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle image {} not found", image_id)))?;

        let mut tx = self.pool.begin().await?;

        self.image_repo
            .clear_primary_with_tx(&mut tx, image.vehicle_id)
            .await?;
        self.image_repo.mark_primary_with_tx(&mut tx, image_id).await?;

        tx.commit().await?;

        tracing::info!(image_id, vehicle_id = image.vehicle_id, "Primary vehicle image set");

        Ok(VehicleImage {
            is_primary: true,
            ..image
        })
    }
}
