#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpers::*;
use mobigo::agreements::models::CreateAgreementRequest;
use mobigo::agreements::{AgreementRepository, AgreementService, PaymentCreator, PaymentType};
use mobigo::core::{AppError, Result};
use mobigo::payments::{PaymentMethod, PaymentService, PaymentStatus};
use mobigo::vehicles::VehicleStatus;
use rust_decimal_macros::dec;
use sqlx::{MySql, Transaction};

struct FailingPaymentCreator;

#[async_trait]
impl PaymentCreator for FailingPaymentCreator {
    async fn create_full_payment_for_agreement(
        &self,
        _tx: &mut Transaction<'_, MySql>,
        _agreement_id: i64,
    ) -> Result<i64> {
        Err(AppError::internal("gateway unavailable"))
    }
}

/// Delegates to the real payment service and remembers the ids it hands back
struct RecordingPaymentCreator {
    inner: Arc<PaymentService>,
    created: Mutex<Vec<i64>>,
}

#[async_trait]
impl PaymentCreator for RecordingPaymentCreator {
    async fn create_full_payment_for_agreement(
        &self,
        tx: &mut Transaction<'_, MySql>,
        agreement_id: i64,
    ) -> Result<i64> {
        let payment_id = self
            .inner
            .create_full_payment_for_agreement(tx, agreement_id)
            .await?;
        self.created.lock().unwrap().push(payment_id);
        Ok(payment_id)
    }
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_agreement_requires_confirmed_booking() {
    let services = TestServices::new(create_test_pool().await);
    let customer = services.customer().await;
    let vehicle = services.vehicle(dec!(120000000)).await;
    let booking = services.pending_booking(&customer, &vehicle).await;

    let err = services
        .agreements
        .create_agreement(CreateAgreementRequest {
            booking_id: booking.id,
            final_price: dec!(120000000),
            payment_type: PaymentType::FullPayment,
            terms: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_agreement_for_missing_booking_rejected() {
    let services = TestServices::new(create_test_pool().await);

    let err = services
        .agreements
        .create_agreement(CreateAgreementRequest {
            booking_id: i64::MAX,
            final_price: dec!(1000),
            payment_type: PaymentType::Installment,
            terms: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_full_payment_agreement_sells_vehicle() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, vehicle, agreement) = services
        .agreement(dec!(120000000), PaymentType::FullPayment)
        .await;

    assert_eq!(agreement.final_price, dec!(120000000));
    assert!(!agreement.signed_by_user);
    assert!(!agreement.signed_by_staff);
    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::Sold);

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();

    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, dec!(120000000));
    assert_eq!(payments[0].payment_method, PaymentMethod::FullPayment);
    assert_eq!(payments[0].status, PaymentStatus::Pending);
    assert!(payments[0].external_transaction_id.is_none());
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_installment_agreement_creates_no_payment() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, vehicle, agreement) = services
        .agreement(dec!(95000000), PaymentType::Installment)
        .await;

    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::Booked);

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();
    assert!(payments.is_empty());
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_failed_full_payment_rolls_back_agreement() {
    let pool = create_test_pool().await;
    let services = TestServices::new(pool.clone());
    let customer = services.customer().await;
    let staff = services.staff().await;
    let vehicle = services.vehicle(dec!(75000000)).await;
    let booking = services.confirmed_booking(&customer, &staff, &vehicle).await;

    let agreements = AgreementService::new(pool.clone(), Arc::new(FailingPaymentCreator));
    let err = agreements
        .create_agreement(CreateAgreementRequest {
            booking_id: booking.id,
            final_price: dec!(75000000),
            payment_type: PaymentType::FullPayment,
            terms: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Internal(_)));

    let stored = AgreementRepository::new(pool)
        .find_by_booking_id(booking.id)
        .await
        .unwrap();
    assert!(stored.is_none());
    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::Booked);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_second_agreement_for_booking_conflicts() {
    let services = TestServices::new(create_test_pool().await);
    let (_, _, agreement) = services
        .agreement(dec!(65000000), PaymentType::Installment)
        .await;

    let err = services
        .agreements
        .create_agreement(CreateAgreementRequest {
            booking_id: agreement.booking_id,
            final_price: dec!(65000000),
            payment_type: PaymentType::Installment,
            terms: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_payment_creator_returns_stored_payment_id() {
    let pool = create_test_pool().await;
    let services = TestServices::new(pool.clone());
    let customer = services.customer().await;
    let staff = services.staff().await;
    let vehicle = services.vehicle(dec!(81000000)).await;
    let booking = services.confirmed_booking(&customer, &staff, &vehicle).await;

    let creator = Arc::new(RecordingPaymentCreator {
        inner: services.payments.clone(),
        created: Mutex::new(Vec::new()),
    });
    let agreements = AgreementService::new(pool, creator.clone());
    let agreement = agreements
        .create_agreement(CreateAgreementRequest {
            booking_id: booking.id,
            final_price: dec!(81000000),
            payment_type: PaymentType::FullPayment,
            terms: String::new(),
        })
        .await
        .unwrap();

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();

    assert_eq!(payments.len(), 1);
    assert_eq!(*creator.created.lock().unwrap(), vec![payments[0].id]);
}
