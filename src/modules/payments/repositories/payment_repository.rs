use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentMethod, PaymentStatus};

const PAYMENT_COLUMNS: &str = r#"
    id, agreement_id, amount, payment_method, status, external_transaction_id,
    payment_url, created_at, updated_at, deleted_at
"#;

#[derive(Clone)]
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserts a pending payment and reads it back inside the transaction
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement_id: i64,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Payment> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO payments (agreement_id, amount, payment_method, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(agreement_id)
        .bind(amount)
        .bind(method.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        let query = format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS);
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(result.last_insert_id() as i64)
            .fetch_one(&mut **tx)
            .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let query = format!(
            "SELECT {} FROM payments WHERE id = ? AND deleted_at IS NULL",
            PAYMENT_COLUMNS
        );

        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn list_by_agreement(&self, agreement_id: i64) -> Result<Vec<Payment>> {
        let query = format!(
            "SELECT {} FROM payments WHERE agreement_id = ? AND deleted_at IS NULL ORDER BY id ASC",
            PAYMENT_COLUMNS
        );

        let payments = sqlx::query_as::<_, Payment>(&query)
            .bind(agreement_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Payments of several agreements, ordered by id
    pub async fn list_by_agreement_ids(&self, agreement_ids: &[i64]) -> Result<Vec<Payment>> {
        if agreement_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM payments WHERE deleted_at IS NULL AND agreement_id IN (",
            PAYMENT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in agreement_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let payments = builder
            .build_query_as::<Payment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    pub async fn count_by_agreement_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement_id: i64,
    ) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM payments WHERE agreement_id = ? AND deleted_at IS NULL",
        )
        .bind(agreement_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }

    /// Stores the gateway transaction id and URL; status is left as is
    pub async fn set_gateway_reference(
        &self,
        id: i64,
        transaction_id: &str,
        payment_url: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET external_transaction_id = ?, payment_url = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(transaction_id)
        .bind(payment_url)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Transaction id '{}' is already in use",
                        transaction_id
                    ));
                }
            }
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Payment {} not found", id)));
        }

        Ok(())
    }
}
