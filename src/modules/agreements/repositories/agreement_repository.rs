use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::agreements::models::{Agreement, PaymentType};

// payment_type is an ENUM column; CAST keeps the decode path a plain string
const AGREEMENT_COLUMNS: &str = r#"
    id, booking_id, agreement_date, final_price,
    CAST(payment_type AS CHAR) AS payment_type,
    terms, signed_by_user, signed_by_staff, created_at, updated_at, deleted_at
"#;

#[derive(Clone)]
pub struct AgreementRepository {
    pool: MySqlPool,
}

impl AgreementRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        booking_id: i64,
        final_price: Decimal,
        payment_type: PaymentType,
        terms: &str,
    ) -> Result<Agreement> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO agreements (
                booking_id, agreement_date, final_price, payment_type, terms,
                signed_by_user, signed_by_staff, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, FALSE, FALSE, ?, ?)
            "#,
        )
        .bind(booking_id)
        .bind(now)
        .bind(final_price)
        .bind(payment_type.as_str())
        .bind(terms)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Booking {} already has an agreement",
                        booking_id
                    ));
                }
            }
            AppError::Database(e)
        })?;

        self.find_by_id_with_tx(tx, result.last_insert_id() as i64)
            .await?
            .ok_or_else(|| AppError::internal("Agreement vanished after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Agreement>> {
        let query = format!(
            "SELECT {} FROM agreements WHERE id = ? AND deleted_at IS NULL",
            AGREEMENT_COLUMNS
        );

        let agreement = sqlx::query_as::<_, Agreement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agreement)
    }

    /// Sees rows written earlier in the same transaction
    pub async fn find_by_id_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        id: i64,
    ) -> Result<Option<Agreement>> {
        let query = format!(
            "SELECT {} FROM agreements WHERE id = ? AND deleted_at IS NULL FOR UPDATE",
            AGREEMENT_COLUMNS
        );

        let agreement = sqlx::query_as::<_, Agreement>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(agreement)
    }

    pub async fn find_by_booking_id(&self, booking_id: i64) -> Result<Option<Agreement>> {
        let query = format!(
            "SELECT {} FROM agreements WHERE booking_id = ? AND deleted_at IS NULL",
            AGREEMENT_COLUMNS
        );

        let agreement = sqlx::query_as::<_, Agreement>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agreement)
    }

    pub async fn list_by_booking_ids(&self, booking_ids: &[i64]) -> Result<Vec<Agreement>> {
        if booking_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM agreements WHERE deleted_at IS NULL AND booking_id IN (",
            AGREEMENT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in booking_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let agreements = builder
            .build_query_as::<Agreement>()
            .fetch_all(&self.pool)
            .await?;

        Ok(agreements)
    }
}
