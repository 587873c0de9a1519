use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::bookings::models::{Booking, BookingStatus};

const BOOKING_COLUMNS: &str = r#"
    id, user_id, vehicle_id, status, proposed_datetime, decline_reason,
    created_at, updated_at, deleted_at
"#;

/// Repository for booking rows
#[derive(Clone)]
pub struct BookingRepository {
    pool: MySqlPool,
}

impl BookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        vehicle_id: i64,
        proposed_datetime: DateTime<Utc>,
    ) -> Result<Booking> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (user_id, vehicle_id, status, proposed_datetime, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(vehicle_id)
        .bind(BookingStatus::Pending.as_str())
        .bind(proposed_datetime)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Booking vanished after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Booking>> {
        let query = format!(
            "SELECT {} FROM bookings WHERE id = ? AND deleted_at IS NULL",
            BOOKING_COLUMNS
        );

        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Locks the booking row for the rest of the transaction
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
    ) -> Result<Option<Booking>> {
        let query = format!(
            "SELECT {} FROM bookings WHERE id = ? AND deleted_at IS NULL FOR UPDATE",
            BOOKING_COLUMNS
        );

        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(booking)
    }

    /// Newest first; `user_id` narrows the list to one customer
    pub async fn list(&self, user_id: Option<i64>) -> Result<Vec<Booking>> {
        let bookings = match user_id {
            Some(user_id) => {
                let query = format!(
                    "SELECT {} FROM bookings WHERE user_id = ? AND deleted_at IS NULL ORDER BY created_at DESC, id DESC",
                    BOOKING_COLUMNS
                );
                sqlx::query_as::<_, Booking>(&query)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {} FROM bookings WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC",
                    BOOKING_COLUMNS
                );
                sqlx::query_as::<_, Booking>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(bookings)
    }

    /// Guarded status move; false when the row is no longer in `from`
    pub async fn transition_status_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = ?, updated_at = ?
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

    pub async fn set_status_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
        status: BookingStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Booking {} not found", id)));
        }

        Ok(())
    }

    /// Persists a decline; only succeeds while the row is still pending
    pub async fn save_decline(&self, booking: &Booking) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?, proposed_datetime = NULL, decline_reason = ?, updated_at = ?
            WHERE id = ? AND status = ? AND deleted_at IS NULL
            "#,
        )
        .bind(booking.status.as_str())
        .bind(&booking.decline_reason)
        .bind(Utc::now())
        .bind(booking.id)
        .bind(BookingStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
