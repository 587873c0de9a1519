use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Installment lifecycle: `pending -> overdue` by the penalty job,
/// `pending | overdue -> paid` externally; `failed` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
    Failed,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Failed => "failed",
        }
    }

    /// Statuses the penalty job still charges
    pub fn accrues_penalty(&self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstallmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid installment status: {}", s)),
        }
    }
}

impl TryFrom<String> for InstallmentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// One monthly bill of an installment plan.
/// `total_due == amount_due + penalty_amount` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Installment {
    pub id: i64,
    pub payment_id: i64,
    pub due_date: NaiveDate,
    pub amount_due: Decimal,
    pub penalty_amount: Decimal,
    pub total_due: Decimal,
    #[sqlx(try_from = "String")]
    pub status: InstallmentStatus,
    pub paid_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Whole days elapsed since midnight UTC of the due date, at least one.
/// Counting calendar days from the UTC date of `now` floors the elapsed hours by 24.
pub fn days_late(due_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - due_date).num_days().max(1)
}

impl Installment {
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status.accrues_penalty()
    }

    /// Recomputes the penalty from scratch so repeated runs on one day agree.
    /// Returns the days late that were charged.
    pub fn apply_penalty(&mut self, now: DateTime<Utc>, daily_penalty: Decimal) -> i64 {
        if self.status == InstallmentStatus::Pending {
            self.status = InstallmentStatus::Overdue;
        }

        let days = days_late(self.due_date, now);
        self.penalty_amount = Decimal::from(days) * daily_penalty;
        self.total_due = self.amount_due + self.penalty_amount;
        self.updated_at = now;

        days
    }
}
