// Property tests for the flat-rate installment calculator

use chrono::NaiveDate;
use mobigo::core::AppError;
use mobigo::payments::InstallmentCalculator;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

#[test]
fn test_reference_vehicle_plan() {
    let quote = InstallmentCalculator::quote(
        dec!(120000000),
        dec!(20000000),
        12,
        dec!(10),
        start_date(),
    )
    .unwrap();

    assert_eq!(quote.loan_principal, dec!(100000000));
    assert_eq!(quote.total_interest, dec!(10000000));
    assert_eq!(quote.total_repayment, dec!(110000000));
    assert_eq!(quote.monthly_bill, dec!(9166666.67));

    // 12 * 9166666.67 overshoots the repayment by 4 cents; not redistributed
    let billed = quote.monthly_bill * Decimal::from(12);
    assert_eq!(billed - quote.total_repayment, dec!(0.04));
}

#[test]
fn test_interest_rounds_half_away_from_zero() {
    // 1000.10 * 5% * 1 / 12 = 4.16708.. -> 4.17
    let quote =
        InstallmentCalculator::quote(dec!(1000.10), Decimal::ZERO, 1, dec!(5), start_date())
            .unwrap();
    assert_eq!(quote.total_interest, dec!(4.17));
    assert_eq!(quote.monthly_bill, dec!(1004.27));
}

#[test]
fn test_down_payment_equal_to_price_rejected() {
    let result =
        InstallmentCalculator::quote(dec!(50000000), dec!(50000000), 12, dec!(10), start_date());
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    let result =
        InstallmentCalculator::quote(dec!(50000000), dec!(60000000), 12, dec!(10), start_date());
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_zero_tenor_rejected() {
    let result = InstallmentCalculator::quote(dec!(1000), dec!(100), 0, dec!(10), start_date());
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_bill_rounding_to_zero_rejected() {
    // 0.01 over 12 months rounds to a zero bill
    let result =
        InstallmentCalculator::quote(dec!(100.01), dec!(100), 12, Decimal::ZERO, start_date());
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_extreme_rate_is_an_argument_error() {
    let rate = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
    let result = InstallmentCalculator::quote(
        dec!(9999999999999.99),
        Decimal::ZERO,
        360,
        rate,
        start_date(),
    );
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_repayment_above_column_limit_rejected() {
    // 100% a year for 30 years on the largest principal is 31x the principal
    let result = InstallmentCalculator::quote(
        dec!(9999999999999.99),
        Decimal::ZERO,
        360,
        dec!(100),
        start_date(),
    );
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_leap_year_due_dates() {
    let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let dates = InstallmentCalculator::due_dates(jan_31, 3).unwrap();

    assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
}

proptest! {
    /// Each bill is within half a cent of the exact share, so the bills never
    /// drift from the repayment by more than half a cent per month
    #[test]
    fn prop_bills_cover_repayment_within_rounding(
        principal_cents in 100_000i64..1_000_000_000_000,
        down_cents in 0i64..1_000_000_000_000,
        tenor in 1u32..=360,
        rate_bp in 0i64..=5_000,
    ) {
        let down_payment = Decimal::new(down_cents, 2);
        let final_price = down_payment + Decimal::new(principal_cents, 2);
        let rate = Decimal::new(rate_bp, 2);

        let quote = InstallmentCalculator::quote(final_price, down_payment, tenor, rate, start_date())
            .unwrap();

        prop_assert_eq!(quote.loan_principal, final_price - down_payment);
        prop_assert_eq!(quote.total_repayment, quote.loan_principal + quote.total_interest);
        prop_assert!(quote.total_interest >= Decimal::ZERO);
        prop_assert!(quote.monthly_bill > Decimal::ZERO);
        prop_assert!(quote.monthly_bill.scale() <= 2);

        let drift = (quote.monthly_bill * Decimal::from(tenor) - quote.total_repayment).abs();
        prop_assert!(drift <= Decimal::new(5, 3) * Decimal::from(tenor));
    }

    #[test]
    fn prop_due_dates_are_monthly_and_increasing(
        year in 2000i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        tenor in 1u32..=360,
    ) {
        let start = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let dates = InstallmentCalculator::due_dates(start, tenor).unwrap();

        prop_assert_eq!(dates.len(), tenor as usize);
        prop_assert!(dates[0] > start);
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        // Days 1..=28 exist in every month, so no clamping happens
        prop_assert!(dates.iter().all(|d| chrono::Datelike::day(d) == day));
    }

    #[test]
    fn prop_zero_rate_charges_no_interest(
        principal_cents in 100_000i64..100_000_000_000,
        tenor in 1u32..=360,
    ) {
        let price = Decimal::new(principal_cents, 2);
        let quote = InstallmentCalculator::quote(price, Decimal::ZERO, tenor, Decimal::ZERO, start_date())
            .unwrap();

        prop_assert_eq!(quote.total_interest, Decimal::ZERO);
        prop_assert_eq!(quote.total_repayment, price);
    }
}
