use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Installment, InstallmentStatus};

const INSTALLMENT_COLUMNS: &str = r#"
    id, payment_id, due_date, amount_due, penalty_amount, total_due, status,
    paid_date, created_at, updated_at, deleted_at
"#;

/// Installment access needed by the penalty job
#[async_trait]
pub trait InstallmentStore: Send + Sync {
    /// Installments due before `today` that are still pending or overdue
    async fn find_penalizable(&self, today: NaiveDate) -> Result<Vec<Installment>>;

    /// Persists status, penalty and total; false when the row left pending/overdue meanwhile
    async fn save_penalty(&self, installment: &Installment) -> Result<bool>;
}

#[derive(Clone)]
pub struct InstallmentRepository {
    pool: MySqlPool,
}

impl InstallmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// One pending row per due date, each billed `monthly_bill` with no penalty
    pub async fn create_plan_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        payment_id: i64,
        monthly_bill: Decimal,
        due_dates: &[NaiveDate],
    ) -> Result<Vec<Installment>> {
        let now = Utc::now();

        for due_date in due_dates {
            sqlx::query(
                r#"
                INSERT INTO installments (
                    payment_id, due_date, amount_due, penalty_amount, total_due, status,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(payment_id)
            .bind(due_date)
            .bind(monthly_bill)
            .bind(Decimal::ZERO)
            .bind(monthly_bill)
            .bind(InstallmentStatus::Pending.as_str())
            .bind(now)
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                AppError::internal(format!(
                    "Failed to create installment due {}: {}",
                    due_date, e
                ))
            })?;
        }

        let query = format!(
            "SELECT {} FROM installments WHERE payment_id = ? ORDER BY due_date ASC, id ASC",
            INSTALLMENT_COLUMNS
        );
        let installments = sqlx::query_as::<_, Installment>(&query)
            .bind(payment_id)
            .fetch_all(&mut **tx)
            .await?;

        Ok(installments)
    }

    pub async fn list_by_payment(&self, payment_id: i64) -> Result<Vec<Installment>> {
        let query = format!(
            "SELECT {} FROM installments WHERE payment_id = ? AND deleted_at IS NULL ORDER BY due_date ASC, id ASC",
            INSTALLMENT_COLUMNS
        );

        let installments = sqlx::query_as::<_, Installment>(&query)
            .bind(payment_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(installments)
    }
}

#[async_trait]
impl InstallmentStore for InstallmentRepository {
    async fn find_penalizable(&self, today: NaiveDate) -> Result<Vec<Installment>> {
        let query = format!(
            r#"
            SELECT {} FROM installments
            WHERE due_date < ? AND status IN (?, ?) AND deleted_at IS NULL
            ORDER BY due_date ASC, id ASC
            "#,
            INSTALLMENT_COLUMNS
        );

        let installments = sqlx::query_as::<_, Installment>(&query)
            .bind(today)
            .bind(InstallmentStatus::Pending.as_str())
            .bind(InstallmentStatus::Overdue.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(installments)
    }

    async fn save_penalty(&self, installment: &Installment) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE installments
            SET status = ?, penalty_amount = ?, total_due = ?, updated_at = ?
            WHERE id = ? AND status IN (?, ?) AND deleted_at IS NULL
            "#,
        )
        .bind(installment.status.as_str())
        .bind(installment.penalty_amount)
        .bind(installment.total_due)
        .bind(installment.updated_at)
        .bind(installment.id)
        .bind(InstallmentStatus::Pending.as_str())
        .bind(InstallmentStatus::Overdue.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
