use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{NewSchedule, Schedule, ScheduleStatus};

const SCHEDULE_COLUMNS: &str = r#"
    id, booking_id, user_id, appointment_datetime, notes, status,
    created_at, updated_at, deleted_at
"#;

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: MySqlPool,
}

impl ScheduleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserts a `scheduled` appointment and reads it back inside the transaction
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        schedule: &NewSchedule,
    ) -> Result<Schedule> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO schedules (
                booking_id, user_id, appointment_datetime, notes, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(schedule.booking_id)
        .bind(schedule.staff_id)
        .bind(schedule.appointment_datetime)
        .bind(&schedule.notes)
        .bind(ScheduleStatus::Scheduled.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Booking {} already has a schedule",
                        schedule.booking_id
                    ));
                }
            }
            AppError::Database(e)
        })?;

        let query = format!("SELECT {} FROM schedules WHERE id = ?", SCHEDULE_COLUMNS);
        let created = sqlx::query_as::<_, Schedule>(&query)
            .bind(result.last_insert_id() as i64)
            .fetch_one(&mut **tx)
            .await?;

        Ok(created)
    }

    pub async fn find_by_booking_id(&self, booking_id: i64) -> Result<Option<Schedule>> {
        let query = format!(
            "SELECT {} FROM schedules WHERE booking_id = ? AND deleted_at IS NULL",
            SCHEDULE_COLUMNS
        );

        let schedule = sqlx::query_as::<_, Schedule>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(schedule)
    }
}
