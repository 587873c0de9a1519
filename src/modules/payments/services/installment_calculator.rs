use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::core::{AppError, Money, Result};
use crate::modules::payments::models::InstallmentQuote;

/// Flat-rate installment math
///
/// Interest is charged once on the whole principal for the whole tenor:
/// `interest = principal * rate% * tenor / 12`. The repayment is split into
/// `tenor` equal bills rounded to cents; the rounding remainder is not
/// redistributed, so the bills may differ from the repayment by under a cent each.
pub struct InstallmentCalculator;

fn overflow() -> AppError {
    AppError::invalid_argument("Installment amounts are out of range")
}

impl InstallmentCalculator {
    pub fn quote(
        final_price: Decimal,
        down_payment: Decimal,
        tenor_months: u32,
        annual_interest_rate: Decimal,
        start_date: NaiveDate,
    ) -> Result<InstallmentQuote> {
        if tenor_months == 0 {
            return Err(AppError::invalid_argument("Tenor must be at least 1 month"));
        }

        if down_payment >= final_price {
            return Err(AppError::invalid_argument(format!(
                "Down payment ({}) must be less than the final price ({})",
                down_payment, final_price
            )));
        }

        let tenor = Decimal::from(tenor_months);
        let loan_principal = final_price - down_payment;

        // principal * (rate / 100) * (tenor / 12), divided once to limit precision loss
        let total_interest = loan_principal
            .checked_mul(annual_interest_rate)
            .and_then(|v| v.checked_mul(tenor))
            .and_then(|v| v.checked_div(Decimal::from(1200)))
            .map(Money::round)
            .ok_or_else(overflow)?;
        let total_repayment = loan_principal
            .checked_add(total_interest)
            .ok_or_else(overflow)?;

        if total_repayment > Money::max_amount() {
            return Err(AppError::invalid_argument(format!(
                "Total repayment {} exceeds the maximum amount",
                total_repayment
            )));
        }

        let monthly_bill = Money::round(total_repayment / tenor);

        if monthly_bill <= Decimal::ZERO {
            return Err(AppError::invalid_argument(
                "Calculated monthly bill must be positive",
            ));
        }

        let due_dates = Self::due_dates(start_date, tenor_months)?;

        tracing::debug!(
            %loan_principal,
            %total_interest,
            %total_repayment,
            %monthly_bill,
            tenor_months,
            "Installment quote calculated"
        );

        Ok(InstallmentQuote {
            loan_principal,
            total_interest,
            total_repayment,
            monthly_bill,
            due_dates,
        })
    }

    /// `start + i months` for i in 1..=tenor; short months clamp to their last day
    pub fn due_dates(start_date: NaiveDate, tenor_months: u32) -> Result<Vec<NaiveDate>> {
        (1..=tenor_months)
            .map(|i| {
                start_date
                    .checked_add_months(Months::new(i))
                    .ok_or_else(|| AppError::invalid_argument("Due date out of range"))
            })
            .collect()
    }
}
