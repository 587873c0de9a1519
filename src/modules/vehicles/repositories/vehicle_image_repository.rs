use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::vehicles::models::VehicleImage;

/// Repository for vehicle image records
#[derive(Clone)]
pub struct VehicleImageRepository {
    pool: MySqlPool,
}

impl VehicleImageRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        vehicle_id: i64,
        image_url: &str,
        is_primary: bool,
    ) -> Result<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO vehicle_images (vehicle_id, image_url, is_primary, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(vehicle_id)
        .bind(image_url)
        .bind(is_primary)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<VehicleImage>> {
        let image = sqlx::query_as::<_, VehicleImage>(
            r#"
            SELECT id, vehicle_id, image_url, is_primary, created_at, updated_at, deleted_at
            FROM vehicle_images
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Primary image first, then insertion order
    pub async fn list_by_vehicle(&self, vehicle_id: i64) -> Result<Vec<VehicleImage>> {
        let images = sqlx::query_as::<_, VehicleImage>(
            r#"
            SELECT id, vehicle_id, image_url, is_primary, created_at, updated_at, deleted_at
            FROM vehicle_images
            WHERE vehicle_id = ? AND deleted_at IS NULL
            ORDER BY is_primary DESC, id ASC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    pub async fn clear_primary_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        vehicle_id: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE vehicle_images SET is_primary = FALSE, updated_at = ?
            WHERE vehicle_id = ? AND is_primary = TRUE AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(vehicle_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn mark_primary_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE vehicle_images SET is_primary = TRUE, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Vehicle image {} not found", id)));
        }

        Ok(())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE vehicle_images SET deleted_at = ?, is_primary = FALSE, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Vehicle image {} not found", id)));
        }

        Ok(())
    }
}
