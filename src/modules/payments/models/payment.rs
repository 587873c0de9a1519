use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Gateway-style payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Settlement,
    Expire,
    Failure,
    Cancel,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Settlement => "settlement",
            Self::Expire => "expire",
            Self::Failure => "failure",
            Self::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "settlement" => Ok(Self::Settlement),
            "expire" => Ok(Self::Expire),
            "failure" => Ok(Self::Failure),
            "cancel" => Ok(Self::Cancel),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// What a payment row settles; stored as a human-readable label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Full Payment")]
    FullPayment,
    #[serde(rename = "Down Payment")]
    DownPayment,
    #[serde(rename = "Installment")]
    Installment,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullPayment => "Full Payment",
            Self::DownPayment => "Down Payment",
            Self::Installment => "Installment",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Full Payment" => Ok(Self::FullPayment),
            "Down Payment" => Ok(Self::DownPayment),
            "Installment" => Ok(Self::Installment),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub agreement_id: i64,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub external_transaction_id: Option<String>,
    pub payment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Synthetic gateway transaction id: `MOBI-TX-{payment id}-{unix seconds}`
    pub fn synthetic_transaction_id(payment_id: i64, now: DateTime<Utc>) -> String {
        format!("MOBI-TX-{}-{}", payment_id, now.timestamp())
    }

    pub fn synthetic_payment_url(gateway_base_url: &str, transaction_id: &str) -> String {
        format!(
            "{}/snap/v1/transactions/{}",
            gateway_base_url.trim_end_matches('/'),
            transaction_id
        )
    }
}
