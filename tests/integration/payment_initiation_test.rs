#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use mobigo::agreements::PaymentType;
use mobigo::core::AppError;
use rust_decimal_macros::dec;

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_owner_initiates_full_payment() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, _, agreement) = services
        .agreement(dec!(85000000), PaymentType::FullPayment)
        .await;
    let payment = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap()
        .remove(0);

    let initiated = services
        .payments
        .initiate_payment(payment.id, customer.user_id)
        .await
        .unwrap();

    let transaction_id = initiated.external_transaction_id.clone().unwrap();
    assert!(transaction_id.starts_with(&format!("MOBI-TX-{}-", payment.id)));
    assert_eq!(
        initiated.payment_url.as_deref(),
        Some(format!("{}/snap/v1/transactions/{}", TEST_GATEWAY_URL, transaction_id).as_str())
    );

    let stored = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap()
        .remove(0);
    assert_eq!(stored.external_transaction_id, Some(transaction_id));
    assert_eq!(stored.payment_url, initiated.payment_url);
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_other_customer_cannot_initiate() {
    let services = TestServices::new(create_test_pool().await);
    let (customer, _, agreement) = services
        .agreement(dec!(85000000), PaymentType::FullPayment)
        .await;
    let payment = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap()
        .remove(0);

    let stranger = services.customer().await;
    let err = services
        .payments
        .initiate_payment(payment.id, stranger.user_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));

    let stored = services
        .payments
        .list_agreement_payments(agreement.id, &customer)
        .await
        .unwrap()
        .remove(0);
    assert!(stored.external_transaction_id.is_none());
}

#[tokio::test]
#[ignore = "Requires test database configuration"]
async fn test_initiate_missing_payment_not_found() {
    let services = TestServices::new(create_test_pool().await);
    let customer = services.customer().await;

    let err = services
        .payments
        .initiate_payment(i64::MAX, customer.user_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}
