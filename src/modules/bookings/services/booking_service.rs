// Booking workflow: create, confirm (with schedule), decline, cancel.
// Confirmation and cancellation touch the vehicle ledger in the same
// transaction as the booking row.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::agreements::models::Agreement;
use crate::modules::agreements::repositories::AgreementRepository;
use crate::modules::bookings::models::{
    Booking, BookingDetails, BookingStatus, NewSchedule, Schedule,
};
use crate::modules::bookings::repositories::{BookingRepository, ScheduleRepository};
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::users::models::UserResponse;
use crate::modules::users::repositories::UserRepository;
use crate::modules::vehicles::models::{Vehicle, VehicleStatus};
use crate::modules::vehicles::repositories::VehicleRepository;

pub struct BookingService {
    pool: MySqlPool,
    booking_repo: BookingRepository,
    schedule_repo: ScheduleRepository,
    vehicle_repo: VehicleRepository,
    user_repo: UserRepository,
    agreement_repo: AgreementRepository,
    payment_repo: PaymentRepository,
}

impl BookingService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            booking_repo: BookingRepository::new(pool.clone()),
            schedule_repo: ScheduleRepository::new(pool.clone()),
            vehicle_repo: VehicleRepository::new(pool.clone()),
            user_repo: UserRepository::new(pool.clone()),
            agreement_repo: AgreementRepository::new(pool.clone()),
            payment_repo: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// New pending booking; the vehicle is not reserved until confirmation
    pub async fn create_booking(
        &self,
        customer_id: i64,
        vehicle_id: i64,
        proposed_datetime: DateTime<Utc>,
    ) -> Result<Booking> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {} not found", vehicle_id)))?;

        vehicle.ensure_available()?;

        let booking = self
            .booking_repo
            .create(customer_id, vehicle_id, proposed_datetime)
            .await?;

        tracing::info!(
            booking_id = booking.id,
            customer_id,
            vehicle_id,
            proposed_datetime = %proposed_datetime,
            "Booking created"
        );

        Ok(booking)
    }

    /// Confirms a pending booking: vehicle -> booked, booking -> confirmed and a
    /// schedule at the proposed time, committed together
    pub async fn confirm_schedule(
        &self,
        booking_id: i64,
        staff_id: i64,
        notes: &str,
    ) -> Result<Schedule> {
        let mut tx = self.pool.begin().await?;

        let booking = self
            .booking_repo
            .find_by_id_for_update(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))?;

        let appointment_datetime = booking.confirmation_time()?;

        let vehicle = self
            .vehicle_repo
            .find_by_id_for_update(&mut tx, booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::invalid_state("Associated vehicle not found"))?;

        if vehicle.status != VehicleStatus::Available {
            return Err(AppError::invalid_state(format!(
                "Vehicle {} is no longer available (status: {})",
                vehicle.id, vehicle.status
            )));
        }

        if !self
            .vehicle_repo
            .transition_status_with_tx(
                &mut tx,
                vehicle.id,
                VehicleStatus::Available,
                VehicleStatus::Booked,
            )
            .await?
        {
            return Err(AppError::invalid_state("Vehicle is no longer available"));
        }

        if !self
            .booking_repo
            .transition_status_with_tx(
                &mut tx,
                booking_id,
                BookingStatus::Pending,
                BookingStatus::Confirmed,
            )
            .await?
        {
            return Err(AppError::invalid_state("Only pending bookings can be confirmed"));
        }

        let schedule = self
            .schedule_repo
            .create_with_tx(
                &mut tx,
                &NewSchedule {
                    booking_id,
                    staff_id,
                    appointment_datetime,
                    notes: notes.to_string(),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id,
            staff_id,
            vehicle_id = vehicle.id,
            schedule_id = schedule.id,
            "Booking confirmed and schedule created"
        );

        Ok(schedule)
    }

    /// Sends a pending booking back to the customer for a new proposal
    pub async fn decline_booking(&self, booking_id: i64, reason: &str) -> Result<Booking> {
        let mut booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))?;

        booking.decline(reason)?;

        if !self.booking_repo.save_decline(&booking).await? {
            return Err(AppError::invalid_state("Only pending bookings can be declined"));
        }

        tracing::info!(booking_id, "Booking declined, reschedule requested");

        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))
    }

    /// Cancels a booking from any status; a confirmed booking releases its vehicle
    /// when that vehicle is still `booked`
    pub async fn update_booking_status(
        &self,
        booking_id: i64,
        new_status: BookingStatus,
        caller: &AuthenticatedUser,
    ) -> Result<Booking> {
        BookingStatus::ensure_cancellation_target(new_status)?;

        let mut tx = self.pool.begin().await?;

        let booking = self
            .booking_repo
            .find_by_id_for_update(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))?;

        if !caller.is_staff() && !booking.is_owned_by(caller.user_id) {
            return Err(AppError::unauthorized("You do not own this booking"));
        }

        let mut vehicle_released = false;
        if booking.holds_vehicle() {
            vehicle_released = self
                .vehicle_repo
                .transition_status_with_tx(
                    &mut tx,
                    booking.vehicle_id,
                    VehicleStatus::Booked,
                    VehicleStatus::Available,
                )
                .await?;
        }

        self.booking_repo
            .set_status_with_tx(&mut tx, booking_id, new_status)
            .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id,
            previous_status = %booking.status,
            vehicle_id = booking.vehicle_id,
            vehicle_released,
            "Booking cancelled"
        );

        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))
    }

    /// Staff see every booking, customers only their own; newest first
    pub async fn list_bookings(&self, caller: &AuthenticatedUser) -> Result<Vec<BookingDetails>> {
        let filter = if caller.is_staff() {
            None
        } else {
            Some(caller.user_id)
        };

        let bookings = self.booking_repo.list(filter).await?;

        self.load_details_batch(bookings).await
    }

    pub async fn get_booking_details(
        &self,
        booking_id: i64,
        caller: &AuthenticatedUser,
    ) -> Result<BookingDetails> {
        let booking = self.find_visible_booking(booking_id, caller).await?;

        self.load_details(booking).await
    }

    /// Schedule created when the booking was confirmed
    pub async fn get_schedule(
        &self,
        booking_id: i64,
        caller: &AuthenticatedUser,
    ) -> Result<Schedule> {
        self.find_visible_booking(booking_id, caller).await?;

        self.schedule_repo
            .find_by_booking_id(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Schedule for booking {} not found", booking_id))
            })
    }

    async fn find_visible_booking(
        &self,
        booking_id: i64,
        caller: &AuthenticatedUser,
    ) -> Result<Booking> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", booking_id)))?;

        if !caller.is_staff() && !booking.is_owned_by(caller.user_id) {
            return Err(AppError::unauthorized("You do not own this booking"));
        }

        Ok(booking)
    }

    /// Joined view for many bookings with one query per related table
    async fn load_details_batch(&self, bookings: Vec<Booking>) -> Result<Vec<BookingDetails>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids = unique_ids(bookings.iter().map(|b| b.user_id));
        let vehicle_ids = unique_ids(bookings.iter().map(|b| b.vehicle_id));
        let booking_ids: Vec<i64> = bookings.iter().map(|b| b.id).collect();

        let users: HashMap<i64, UserResponse> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.into()))
            .collect();

        let vehicles: HashMap<i64, Vehicle> = self
            .vehicle_repo
            .find_by_ids(&vehicle_ids)
            .await?
            .into_iter()
            .map(|vehicle| (vehicle.id, vehicle))
            .collect();

        let mut agreements: HashMap<i64, Agreement> = self
            .agreement_repo
            .list_by_booking_ids(&booking_ids)
            .await?
            .into_iter()
            .map(|agreement| (agreement.booking_id, agreement))
            .collect();

        let agreement_ids: Vec<i64> = agreements.values().map(|a| a.id).collect();
        let mut payments: HashMap<i64, Vec<Payment>> = HashMap::new();
        for payment in self
            .payment_repo
            .list_by_agreement_ids(&agreement_ids)
            .await?
        {
            payments.entry(payment.agreement_id).or_default().push(payment);
        }

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let agreement = agreements.remove(&booking.id);
                let agreement_payments = agreement
                    .as_ref()
                    .and_then(|a| payments.remove(&a.id))
                    .unwrap_or_default();

                BookingDetails {
                    // one customer may hold several bookings
                    user: users.get(&booking.user_id).cloned(),
                    vehicle: vehicles.get(&booking.vehicle_id).cloned(),
                    agreement,
                    payments: agreement_payments,
                    booking,
                }
            })
            .collect())
    }

    async fn load_details(&self, booking: Booking) -> Result<BookingDetails> {
        let user = self
            .user_repo
            .find_by_id(booking.user_id)
            .await?
            .map(Into::into);
        let vehicle = self.vehicle_repo.find_by_id(booking.vehicle_id).await?;
        let agreement = self.agreement_repo.find_by_booking_id(booking.id).await?;

        let payments = match &agreement {
            Some(agreement) => self.payment_repo.list_by_agreement(agreement.id).await?,
            None => Vec::new(),
        };

        Ok(BookingDetails {
            booking,
            user,
            vehicle,
            agreement,
            payments,
        })
    }
}

fn unique_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
