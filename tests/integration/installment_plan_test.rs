#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{Months, Utc};
use helpers::*;
use mobigo::agreements::PaymentType;
use mobigo::core::AppError;
use mobigo::payments::models::GeneratePlanRequest;
use mobigo::payments::{InstallmentCalculator, InstallmentStatus, PaymentMethod};
use mobigo::vehicles::VehicleStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn plan_request(agreement_id: i64, down_payment: Decimal) -> GeneratePlanRequest {
    GeneratePlanRequest {
        agreement_id,
        down_payment,
        tenor: 12,
        annual_interest_rate: dec!(10),
    }
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_generate_reference_plan() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, vehicle, agreement) = services
        .agreement(dec!(120000000), PaymentType::Installment)
        .await;

    let summary = services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(20000000)))
        .await
        .unwrap();

    assert_eq!(summary.loan_principal, dec!(100000000));
    assert_eq!(summary.total_interest, dec!(10000000));
    assert_eq!(summary.total_repayment, dec!(110000000));
    assert_eq!(summary.monthly_bill, dec!(9166666.67));

    assert_eq!(summary.down_payment_record.amount, dec!(20000000));
    assert_eq!(summary.down_payment_record.payment_method, PaymentMethod::DownPayment);
    assert_eq!(summary.installment_payment.amount, dec!(110000000));
    assert_eq!(summary.installment_payment.payment_method, PaymentMethod::Installment);

    assert_eq!(summary.installments.len(), 12);
    let today = Utc::now().date_naive();
    for (i, installment) in summary.installments.iter().enumerate() {
        assert_eq!(installment.payment_id, summary.installment_payment.id);
        assert_eq!(installment.status, InstallmentStatus::Pending);
        assert_eq!(installment.amount_due, dec!(9166666.67));
        assert_eq!(installment.penalty_amount, Decimal::ZERO);
        assert_eq!(installment.total_due, installment.amount_due);
        assert_eq!(
            Some(installment.due_date),
            today.checked_add_months(Months::new(i as u32 + 1))
        );
    }

    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::OnInstallment);

    let listed = services
        .payments
        .list_payment_installments(summary.installment_payment.id, &customer)
        .await
        .unwrap();
    assert_eq!(listed.len(), 12);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_second_plan_conflicts() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, _, agreement) = services
        .agreement(dec!(100000000), PaymentType::Installment)
        .await;

    services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(10000000)))
        .await
        .unwrap();

    let err = services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(10000000)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_down_payment_at_price_rejected_without_writes() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, vehicle, agreement) = services
        .agreement(dec!(50000000), PaymentType::Installment)
        .await;

    let err = services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(50000000)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();
    assert!(payments.is_empty());
    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::Booked);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_plan_for_full_payment_agreement_rejected() {
    let services = TestServices::new(create_test_pool().await);
    let (_, _, agreement) = services
        .agreement(dec!(30000000), PaymentType::FullPayment)
        .await;

    let err = services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(1000000)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_plan_for_missing_agreement_not_found() {
    let services = TestServices::new(create_test_pool().await);

    let err = services
        .payments
        .generate_installment_plan(plan_request(i64::MAX, dec!(1000)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_stranger_cannot_list_installments() {
    let services = TestServices::new(create_test_pool().await);
    let (_, _, agreement) = services
        .agreement(dec!(40000000), PaymentType::Installment)
        .await;
    let summary = services
        .payments
        .generate_installment_plan(plan_request(agreement.id, dec!(4000000)))
        .await
        .unwrap();

    let stranger = services.customer().await;
    let err = services
        .payments
        .list_payment_installments(summary.installment_payment.id, &stranger)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let staff = services.staff().await;
    assert!(services
        .payments
        .list_payment_installments(summary.installment_payment.id, &staff)
        .await
        .is_ok());
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_missing_agreement_reported_before_argument_errors() {
    let services = TestServices::new(create_test_pool().await);

    let err = services
        .payments
        .generate_installment_plan(GeneratePlanRequest {
            agreement_id: i64::MAX,
            down_payment: dec!(1000),
            tenor: 0,
            annual_interest_rate: dec!(10),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_failed_installment_insert_rolls_back_whole_plan() {
    let price = dec!(61234567.89);
    let services = TestServices::new(create_test_pool().await);
    let (customer, vehicle, agreement) = services
        .agreement(price, PaymentType::Installment)
        .await;

    // Installments are the third write, after both payment rows
    let request = GeneratePlanRequest {
        agreement_id: agreement.id,
        down_payment: Decimal::ZERO,
        tenor: 12,
        annual_interest_rate: Decimal::ZERO,
    };
    let quote = InstallmentCalculator::quote(
        price,
        Decimal::ZERO,
        12,
        Decimal::ZERO,
        Utc::now().date_naive(),
    )
    .unwrap();
    sqlx::raw_sql(&format!(
        "CREATE TRIGGER IF NOT EXISTS installments_fail_on_marker_amount \
         BEFORE INSERT ON installments FOR EACH ROW \
         IF NEW.amount_due = {} THEN \
         SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'marker amount'; \
         END IF",
        quote.monthly_bill
    ))
    .execute(&services.pool)
    .await
    .unwrap();

    let result = services.payments.generate_installment_plan(request).await;

    sqlx::raw_sql("DROP TRIGGER IF EXISTS installments_fail_on_marker_amount")
        .execute(&services.pool)
        .await
        .unwrap();

    assert!(result.is_err());

    let payments = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap();
    assert!(payments.is_empty());
    assert_eq!(services.vehicle_status(vehicle.id).await, VehicleStatus::Booked);
}
