use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::installment::Installment;
use super::payment::Payment;
use crate::core::{AppError, Money, Result};

/// Longest plan the engine will lay out
pub const MAX_TENOR_MONTHS: u32 = 360;

/// Highest flat annual rate accepted, in percent
pub const MAX_ANNUAL_INTEREST_RATE: u32 = 100;

/// Body of POST /api/payments/generate-plan
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePlanRequest {
    pub agreement_id: i64,
    pub down_payment: Decimal,
    pub tenor: i32,
    /// Percent per year, e.g. `10` for 10%
    pub annual_interest_rate: Decimal,
}

impl GeneratePlanRequest {
    /// Argument checks that need no stored data
    pub fn validate(&self) -> Result<u32> {
        if self.tenor < 1 {
            return Err(AppError::invalid_argument(
                "Tenor must be at least 1 month",
            ));
        }
        let tenor = self.tenor as u32;
        if tenor > MAX_TENOR_MONTHS {
            return Err(AppError::invalid_argument(format!(
                "Tenor cannot exceed {} months",
                MAX_TENOR_MONTHS
            )));
        }

        Money::validate("Down payment", self.down_payment)?;

        if self.annual_interest_rate < Decimal::ZERO {
            return Err(AppError::invalid_argument(
                "Annual interest rate cannot be negative",
            ));
        }

        if self.annual_interest_rate > Decimal::from(MAX_ANNUAL_INTEREST_RATE) {
            return Err(AppError::invalid_argument(format!(
                "Annual interest rate cannot exceed {}%",
                MAX_ANNUAL_INTEREST_RATE
            )));
        }

        Ok(tenor)
    }
}

/// Flat-rate amortization figures for one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallmentQuote {
    pub loan_principal: Decimal,
    pub total_interest: Decimal,
    pub total_repayment: Decimal,
    pub monthly_bill: Decimal,
    pub due_dates: Vec<NaiveDate>,
}

/// Result of generating an installment plan
#[derive(Debug, Clone, Serialize)]
pub struct InstallmentPlanSummary {
    pub agreement_id: i64,
    pub tenor: u32,
    pub annual_interest_rate: Decimal,
    pub down_payment: Decimal,
    pub loan_principal: Decimal,
    pub total_interest: Decimal,
    pub total_repayment: Decimal,
    pub monthly_bill: Decimal,
    pub down_payment_record: Payment,
    pub installment_payment: Payment,
    pub installments: Vec<Installment>,
}
