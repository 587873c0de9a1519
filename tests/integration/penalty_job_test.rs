// Penalty pass against stored installments. Other tests share the database,
// so assertions only look at rows this test created.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};
use helpers::*;
use mobigo::agreements::PaymentType;
use mobigo::config::PenaltyConfig;
use mobigo::payments::models::GeneratePlanRequest;
use mobigo::payments::{Installment, InstallmentRepository, InstallmentStatus, PenaltyChecker};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::MySqlPool;

async fn backdate(pool: &MySqlPool, installment_id: i64, days: i64) {
    let due_date = Utc::now().date_naive() - Duration::days(days);
    sqlx::query("UPDATE installments SET due_date = ? WHERE id = ?")
        .bind(due_date)
        .bind(installment_id)
        .execute(pool)
        .await
        .expect("Failed to backdate installment");
}

async fn set_status(pool: &MySqlPool, installment_id: i64, status: InstallmentStatus) {
    sqlx::query("UPDATE installments SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(installment_id)
        .execute(pool)
        .await
        .expect("Failed to set installment status");
}

async fn plan(services: &TestServices) -> Vec<Installment> {
    let (_, _, agreement) = services
        .agreement(dec!(120000000), PaymentType::Installment)
        .await;

    services
        .payments
        .generate_installment_plan(GeneratePlanRequest {
            agreement_id: agreement.id,
            down_payment: dec!(20000000),
            tenor: 3,
            annual_interest_rate: dec!(10),
        })
        .await
        .expect("Failed to generate plan")
        .installments
}

fn checker(pool: &MySqlPool) -> PenaltyChecker {
    let config = PenaltyConfig {
        daily_amount: dec!(10000),
        check_interval_secs: 60,
    };
    PenaltyChecker::new(Arc::new(InstallmentRepository::new(pool.clone())), &config)
}

async fn reload(services: &TestServices, installment: &Installment) -> Installment {
    let staff = services.staff().await;
    services
        .payments
        .list_payment_installments(installment.payment_id, &staff)
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.id == installment.id)
        .expect("Installment should still exist")
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_overdue_installment_penalized() {
    let pool = create_test_pool().await;
    let services = TestServices::new(pool.clone());
    let installments = plan(&services).await;
    let target = &installments[0];

    backdate(&pool, target.id, 3).await;

    let report = checker(&pool).apply_penalties(Utc::now()).await.unwrap();
    assert!(report.penalized >= 1);

    let updated = reload(&services, target).await;
    assert_eq!(updated.status, InstallmentStatus::Overdue);
    assert_eq!(updated.penalty_amount, dec!(30000));
    assert_eq!(updated.total_due, updated.amount_due + dec!(30000));

    // Later installments are not due yet
    let untouched = reload(&services, &installments[1]).await;
    assert_eq!(untouched.status, InstallmentStatus::Pending);
    assert_eq!(untouched.penalty_amount, Decimal::ZERO);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_repeated_pass_same_day_is_stable() {
    let pool = create_test_pool().await;
    let services = TestServices::new(pool.clone());
    let installments = plan(&services).await;
    let target = &installments[0];

    backdate(&pool, target.id, 5).await;

    let job = checker(&pool);
    let now = Utc::now();
    job.apply_penalties(now).await.unwrap();
    let first = reload(&services, target).await;

    job.apply_penalties(now + Duration::minutes(1)).await.unwrap();
    let second = reload(&services, target).await;

    assert_eq!(first.penalty_amount, dec!(50000));
    assert_eq!(second.penalty_amount, first.penalty_amount);
    assert_eq!(second.total_due, first.total_due);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_paid_installment_not_penalized() {
    let pool = create_test_pool().await;
    let services = TestServices::new(pool.clone());
    let installments = plan(&services).await;
    let target = &installments[0];

    backdate(&pool, target.id, 10).await;
    set_status(&pool, target.id, InstallmentStatus::Paid).await;

    checker(&pool).apply_penalties(Utc::now()).await.unwrap();

    let updated = reload(&services, target).await;
    assert_eq!(updated.status, InstallmentStatus::Paid);
    assert_eq!(updated.penalty_amount, Decimal::ZERO);
    assert_eq!(updated.total_due, updated.amount_due);
}
