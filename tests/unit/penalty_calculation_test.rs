// Overdue penalty math on the installment model

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use mobigo::payments::models::days_late;
use mobigo::payments::{Installment, InstallmentStatus};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn installment(due_date: NaiveDate, status: InstallmentStatus) -> Installment {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Installment {
        id: 1,
        payment_id: 1,
        due_date,
        amount_due: dec!(9166666.67),
        penalty_amount: Decimal::ZERO,
        total_due: dec!(9166666.67),
        status,
        paid_date: None,
        created_at: created,
        updated_at: created,
        deleted_at: None,
    }
}

#[test]
fn test_three_days_late_charges_three_days() {
    let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap();
    let mut item = installment(due, InstallmentStatus::Pending);

    let days = item.apply_penalty(now, dec!(10000));

    assert_eq!(days, 3);
    assert_eq!(item.status, InstallmentStatus::Overdue);
    assert_eq!(item.penalty_amount, dec!(30000));
    assert_eq!(item.total_due, dec!(9196666.67));
}

#[test]
fn test_paid_installment_is_not_overdue() {
    let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

    assert!(!installment(due, InstallmentStatus::Paid).is_overdue_on(today));
    assert!(installment(due, InstallmentStatus::Pending).is_overdue_on(today));
    assert!(installment(due, InstallmentStatus::Overdue).is_overdue_on(today));
}

#[test]
fn test_due_today_is_not_overdue() {
    let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    assert!(!installment(due, InstallmentStatus::Pending).is_overdue_on(due));
}

#[test]
fn test_penalty_recomputed_not_accumulated() {
    let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let mut item = installment(due, InstallmentStatus::Pending);

    item.apply_penalty(Utc.with_ymd_and_hms(2025, 3, 3, 1, 0, 0).unwrap(), dec!(10000));
    assert_eq!(item.penalty_amount, dec!(20000));

    item.apply_penalty(Utc.with_ymd_and_hms(2025, 3, 6, 1, 0, 0).unwrap(), dec!(10000));
    assert_eq!(item.penalty_amount, dec!(50000));
    assert_eq!(item.total_due, item.amount_due + dec!(50000));
}

proptest! {
    #[test]
    fn prop_days_late_counts_calendar_days(
        offset_days in 1i64..2_000,
        seconds_into_day in 0i64..86_400,
    ) {
        let due = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let midnight = Utc.from_utc_datetime(&due.and_hms_opt(0, 0, 0).unwrap());
        let now = midnight + Duration::days(offset_days) + Duration::seconds(seconds_into_day);

        prop_assert_eq!(days_late(due, now), offset_days);
    }

    #[test]
    fn prop_same_day_runs_agree(
        offset_days in 1i64..400,
        first_hour in 0i64..24,
        second_hour in 0i64..24,
        daily_cents in 0i64..10_000_000,
    ) {
        let due = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let day = Utc.from_utc_datetime(&due.and_hms_opt(0, 0, 0).unwrap()) + Duration::days(offset_days);
        let daily = Decimal::new(daily_cents, 2);

        let mut item = installment(due, InstallmentStatus::Pending);
        item.apply_penalty(day + Duration::hours(first_hour), daily);
        let first = (item.penalty_amount, item.total_due, item.status);

        item.apply_penalty(day + Duration::hours(second_hour), daily);

        prop_assert_eq!((item.penalty_amount, item.total_due, item.status), first);
        prop_assert_eq!(item.penalty_amount, Decimal::from(offset_days) * daily);
        prop_assert_eq!(item.total_due, item.amount_due + item.penalty_amount);
    }
}
