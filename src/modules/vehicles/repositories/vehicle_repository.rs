// MySQL persistence for vehicles and the vehicle status ledger.
// Every read filters soft-deleted rows; status writes inside booking,
// agreement and payment flows go through the *_with_tx variants.

use chrono::Utc;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::vehicles::models::{CreateVehicleRequest, Vehicle, VehicleStatus};

const VEHICLE_COLUMNS: &str = r#"
    id, make, model, year, vin, price, description, status,
    created_at, updated_at, deleted_at
"#;

/// Repository for vehicle database operations
#[derive(Clone)]
pub struct VehicleRepository {
    pool: MySqlPool,
}

impl VehicleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateVehicleRequest) -> Result<Vehicle> {
        let now = Utc::now();
        let status = request.status.unwrap_or_default();

        let result = sqlx::query(
            r#"
            INSERT INTO vehicles (
                make, model, year, vin, price, description, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.make.trim())
        .bind(request.model.trim())
        .bind(request.year)
        .bind(request.vin.trim())
        .bind(request.price)
        .bind(&request.description)
        .bind(status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_vin_conflict(e, &request.vin))?;

        let id = result.last_insert_id() as i64;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Vehicle vanished after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>> {
        let query = format!(
            "SELECT {} FROM vehicles WHERE id = ? AND deleted_at IS NULL",
            VEHICLE_COLUMNS
        );

        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Batch read for list views; missing ids are skipped
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM vehicles WHERE deleted_at IS NULL AND id IN (",
            VEHICLE_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let vehicles = builder
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Row-locking read used inside booking and payment transactions
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
    ) -> Result<Option<Vehicle>> {
        let query = format!(
            "SELECT {} FROM vehicles WHERE id = ? AND deleted_at IS NULL FOR UPDATE",
            VEHICLE_COLUMNS
        );

        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Vehicle>> {
        let query = format!(
            "SELECT {} FROM vehicles WHERE deleted_at IS NULL ORDER BY id DESC LIMIT ? OFFSET ?",
            VEHICLE_COLUMNS
        );

        let vehicles = sqlx::query_as::<_, Vehicle>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, id: i64, request: &CreateVehicleRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET make = ?, model = ?, year = ?, vin = ?, price = ?, description = ?,
                status = COALESCE(?, status), updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(request.make.trim())
        .bind(request.model.trim())
        .bind(request.year)
        .bind(request.vin.trim())
        .bind(request.price)
        .bind(&request.description)
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_vin_conflict(e, &request.vin))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Vehicle {} not found", id)));
        }

        Ok(())
    }

    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE vehicles SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Vehicle {} not found", id)));
        }

        Ok(())
    }

    /// Move a vehicle from `from` to `to`; returns false when the row was not in `from`
    pub async fn transition_status_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
        from: VehicleStatus,
        to: VehicleStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET status = ?, updated_at = ?
            WHERE id = ? AND status = ? AND deleted_at IS NULL
            "#,
        )
        .bind(to.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(from.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unconditional status write used by sale and installment flows
    pub async fn set_status_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
        status: VehicleStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE vehicles SET status = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Vehicle {} not found", id)));
        }

        Ok(())
    }
}

fn map_vin_conflict(e: sqlx::Error, vin: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::conflict(format!("Vehicle with VIN '{}' already exists", vin));
        }
    }
    AppError::Database(e)
}
