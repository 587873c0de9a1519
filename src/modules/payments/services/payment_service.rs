// Payment plan engine: full payments, installment plans and payment initiation.
// Every write sequence here runs in one transaction together with the
// vehicle status change it implies.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::agreements::models::{Agreement, PaymentType};
use crate::modules::agreements::repositories::AgreementRepository;
use crate::modules::agreements::services::PaymentCreator;
use crate::modules::bookings::models::Booking;
use crate::modules::bookings::repositories::BookingRepository;
use crate::modules::payments::models::{
    GeneratePlanRequest, Installment, InstallmentPlanSummary, Payment, PaymentMethod,
    PaymentStatus,
};
use crate::modules::payments::repositories::{InstallmentRepository, PaymentRepository};
use crate::modules::payments::services::InstallmentCalculator;
use crate::modules::vehicles::models::VehicleStatus;
use crate::modules::vehicles::repositories::VehicleRepository;

pub struct PaymentService {
    pool: MySqlPool,
    payment_repo: PaymentRepository,
    installment_repo: InstallmentRepository,
    agreement_repo: AgreementRepository,
    booking_repo: BookingRepository,
    vehicle_repo: VehicleRepository,
    gateway_base_url: String,
}

impl PaymentService {
    pub fn new(pool: MySqlPool, gateway_base_url: impl Into<String>) -> Self {
        Self {
            payment_repo: PaymentRepository::new(pool.clone()),
            installment_repo: InstallmentRepository::new(pool.clone()),
            agreement_repo: AgreementRepository::new(pool.clone()),
            booking_repo: BookingRepository::new(pool.clone()),
            vehicle_repo: VehicleRepository::new(pool.clone()),
            gateway_base_url: gateway_base_url.into(),
            pool,
        }
    }

    /// Lays out a down payment, an aggregate installment payment and `tenor`
    /// monthly installments, and moves the vehicle to `on_installment`
    pub async fn generate_installment_plan(
        &self,
        request: GeneratePlanRequest,
    ) -> Result<InstallmentPlanSummary> {
        let mut tx = self.pool.begin().await?;

        let agreement = self
            .agreement_repo
            .find_by_id_with_tx(&mut tx, request.agreement_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Agreement {} not found", request.agreement_id))
            })?;

        let tenor = request.validate()?;
        agreement.ensure_payment_type(PaymentType::Installment)?;

        let existing = self
            .payment_repo
            .count_by_agreement_with_tx(&mut tx, agreement.id)
            .await?;
        if existing > 0 {
            return Err(AppError::conflict(format!(
                "An installment plan already exists for agreement {}",
                agreement.id
            )));
        }

        let quote = InstallmentCalculator::quote(
            agreement.final_price,
            request.down_payment,
            tenor,
            request.annual_interest_rate,
            Utc::now().date_naive(),
        )?;

        let vehicle_id = self.vehicle_for_agreement(&mut tx, &agreement).await?;

        let down_payment_record = self
            .payment_repo
            .create_with_tx(
                &mut tx,
                agreement.id,
                request.down_payment,
                PaymentMethod::DownPayment,
            )
            .await?;

        let installment_payment = self
            .payment_repo
            .create_with_tx(
                &mut tx,
                agreement.id,
                quote.total_repayment,
                PaymentMethod::Installment,
            )
            .await?;

        let installments = self
            .installment_repo
            .create_plan_with_tx(
                &mut tx,
                installment_payment.id,
                quote.monthly_bill,
                &quote.due_dates,
            )
            .await?;

        self.vehicle_repo
            .set_status_with_tx(&mut tx, vehicle_id, VehicleStatus::OnInstallment)
            .await?;

        tx.commit().await?;

        tracing::info!(
            agreement_id = agreement.id,
            vehicle_id,
            tenor,
            monthly_bill = %quote.monthly_bill,
            total_repayment = %quote.total_repayment,
            "Installment plan generated"
        );

        Ok(InstallmentPlanSummary {
            agreement_id: agreement.id,
            tenor,
            annual_interest_rate: request.annual_interest_rate,
            down_payment: request.down_payment,
            loan_principal: quote.loan_principal,
            total_interest: quote.total_interest,
            total_repayment: quote.total_repayment,
            monthly_bill: quote.monthly_bill,
            down_payment_record,
            installment_payment,
            installments,
        })
    }

    /// Attaches a synthetic gateway transaction to a payment the caller owns
    pub async fn initiate_payment(&self, payment_id: i64, customer_id: i64) -> Result<Payment> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", payment_id)))?;

        let agreement = self
            .agreement_repo
            .find_by_id(payment.agreement_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agreement not found for this payment"))?;

        let booking = self.booking_for_agreement(&agreement).await?;

        if !booking.is_owned_by(customer_id) {
            return Err(AppError::unauthorized("You do not own this booking"));
        }

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Payment {} is {} and cannot be initiated",
                payment_id, payment.status
            )));
        }

        let now = Utc::now();
        let transaction_id = Payment::synthetic_transaction_id(payment_id, now);
        let payment_url = Payment::synthetic_payment_url(&self.gateway_base_url, &transaction_id);

        self.payment_repo
            .set_gateway_reference(payment_id, &transaction_id, &payment_url, now)
            .await?;

        tracing::info!(
            payment_id,
            customer_id,
            transaction_id = %transaction_id,
            "Payment initiated"
        );

        Ok(Payment {
            external_transaction_id: Some(transaction_id),
            payment_url: Some(payment_url),
            updated_at: now,
            ..payment
        })
    }

    pub async fn list_agreement_payments(
        &self,
        agreement_id: i64,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<Payment>> {
        let agreement = self
            .agreement_repo
            .find_by_id(agreement_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement {} not found", agreement_id)))?;

        self.ensure_can_view(&agreement, caller).await?;

        self.payment_repo.list_by_agreement(agreement_id).await
    }

    pub async fn list_payment_installments(
        &self,
        payment_id: i64,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<Installment>> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", payment_id)))?;

        let agreement = self
            .agreement_repo
            .find_by_id(payment.agreement_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agreement not found for this payment"))?;

        self.ensure_can_view(&agreement, caller).await?;

        self.installment_repo.list_by_payment(payment_id).await
    }

    async fn ensure_can_view(&self, agreement: &Agreement, caller: &AuthenticatedUser) -> Result<()> {
        if caller.is_staff() {
            return Ok(());
        }

        let booking = self.booking_for_agreement(agreement).await?;
        if !booking.is_owned_by(caller.user_id) {
            return Err(AppError::unauthorized("You do not own this booking"));
        }

        Ok(())
    }

    async fn booking_for_agreement(&self, agreement: &Agreement) -> Result<Booking> {
        self.booking_repo
            .find_by_id(agreement.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found for this agreement"))
    }

    async fn vehicle_for_agreement(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement: &Agreement,
    ) -> Result<i64> {
        let booking = self
            .booking_repo
            .find_by_id_for_update(tx, agreement.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found for this agreement"))?;

        let vehicle = self
            .vehicle_repo
            .find_by_id_for_update(tx, booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::not_found("Vehicle not found for this agreement"))?;

        Ok(vehicle.id)
    }
}

#[async_trait]
impl PaymentCreator for PaymentService {
    async fn create_full_payment_for_agreement(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement_id: i64,
    ) -> Result<i64> {
        let agreement = self
            .agreement_repo
            .find_by_id_with_tx(tx, agreement_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Agreement {} not found", agreement_id)))?;

        agreement.ensure_payment_type(PaymentType::FullPayment)?;

        let vehicle_id = self.vehicle_for_agreement(tx, &agreement).await?;

        let payment = self
            .payment_repo
            .create_with_tx(
                tx,
                agreement.id,
                agreement.final_price,
                PaymentMethod::FullPayment,
            )
            .await?;

        self.vehicle_repo
            .set_status_with_tx(tx, vehicle_id, VehicleStatus::Sold)
            .await?;

        tracing::info!(
            agreement_id,
            payment_id = payment.id,
            vehicle_id,
            amount = %payment.amount,
            "Full payment created, vehicle sold"
        );

        Ok(payment.id)
    }
}
