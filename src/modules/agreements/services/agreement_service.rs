use std::sync::Arc;

use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::agreements::models::{Agreement, CreateAgreementRequest, PaymentType};
use crate::modules::agreements::repositories::AgreementRepository;
use crate::modules::agreements::services::PaymentCreator;
use crate::modules::bookings::repositories::BookingRepository;

pub struct AgreementService {
    pool: MySqlPool,
    agreement_repo: AgreementRepository,
    booking_repo: BookingRepository,
    payment_creator: Arc<dyn PaymentCreator>,
}

impl AgreementService {
    pub fn new(pool: MySqlPool, payment_creator: Arc<dyn PaymentCreator>) -> Self {
        Self {
            agreement_repo: AgreementRepository::new(pool.clone()),
            booking_repo: BookingRepository::new(pool.clone()),
            pool,
            payment_creator,
        }
    }

    /// Issues an agreement for a confirmed booking. A full-payment agreement gets
    /// its payment in the same transaction; if that fails nothing is kept.
    pub async fn create_agreement(&self, request: CreateAgreementRequest) -> Result<Agreement> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let booking = self
            .booking_repo
            .find_by_id_for_update(&mut tx, request.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::invalid_argument(format!("Invalid booking ID {}", request.booking_id))
            })?;

        booking.ensure_agreement_allowed()?;

        let agreement = self
            .agreement_repo
            .create_with_tx(
                &mut tx,
                booking.id,
                request.final_price,
                request.payment_type,
                request.terms.trim(),
            )
            .await?;

        if agreement.payment_type == PaymentType::FullPayment {
            let payment_id = self
                .payment_creator
                .create_full_payment_for_agreement(&mut tx, agreement.id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        agreement_id = agreement.id,
                        error = %e,
                        "Full payment creation failed, rolling back agreement"
                    );
                    AppError::internal(format!(
                        "Failed to create full payment for agreement: {}",
                        e
                    ))
                })?;

            tracing::debug!(
                agreement_id = agreement.id,
                payment_id,
                "Full payment attached to agreement"
            );
        }

        tx.commit().await?;

        tracing::info!(
            agreement_id = agreement.id,
            booking_id = booking.id,
            payment_type = %agreement.payment_type,
            final_price = %agreement.final_price,
            "Agreement created"
        );

        Ok(agreement)
    }

    pub async fn get_agreement(&self, id: i64) -> Result<Agreement> {
        self.agreement_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement {} not found", id)))
    }
}
