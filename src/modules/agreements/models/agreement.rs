use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Money, Result};

/// How the final price of an agreement is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    FullPayment,
    Installment,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullPayment => "full_payment",
            Self::Installment => "installment",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "full_payment" => Ok(Self::FullPayment),
            "installment" => Ok(Self::Installment),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

impl TryFrom<String> for PaymentType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Contract linking a confirmed booking to its payments.
/// Only the signature flags change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Agreement {
    pub id: i64,
    pub booking_id: i64,
    pub agreement_date: DateTime<Utc>,
    pub final_price: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_type: PaymentType,
    pub terms: String,
    pub signed_by_user: bool,
    pub signed_by_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Agreement {
    pub fn ensure_payment_type(&self, expected: PaymentType) -> Result<()> {
        if self.payment_type != expected {
            return Err(AppError::invalid_state(format!(
                "Agreement {} is for {}, not {}",
                self.id, self.payment_type, expected
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgreementRequest {
    pub booking_id: i64,
    pub final_price: Decimal,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub terms: String,
}

impl CreateAgreementRequest {
    pub fn validate(&self) -> Result<()> {
        Money::validate("Final price", self.final_price)?;

        if self.final_price <= Decimal::ZERO {
            return Err(AppError::invalid_argument("Final price must be positive"));
        }

        Ok(())
    }
}
