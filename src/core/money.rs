use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Money helpers for `DECIMAL(15,2)` columns
///
/// All amounts in the system share a single currency and two fractional digits,
/// so rounding lives here instead of on a per-currency enum.
pub struct Money;

impl Money {
    /// Fractional digits stored by the database
    pub const SCALE: u32 = 2;

    /// Largest value a `DECIMAL(15,2)` column accepts
    pub fn max_amount() -> Decimal {
        Decimal::new(9_999_999_999_999_99, Self::SCALE)
    }

    /// Round half away from zero to cents
    pub fn round(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Smallest representable unit (0.01)
    pub fn smallest_unit() -> Decimal {
        Decimal::new(1, Self::SCALE)
    }

    /// Validate a caller-supplied amount
    ///
    /// Rejects negatives, more than two fractional digits and values
    /// that overflow the column.
    pub fn validate(field: &str, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::invalid_argument(format!(
                "{} cannot be negative",
                field
            )));
        }

        if amount.normalize().scale() > Self::SCALE {
            return Err(AppError::invalid_argument(format!(
                "{} must have at most {} decimal places",
                field,
                Self::SCALE
            )));
        }

        if amount > Self::max_amount() {
            return Err(AppError::invalid_argument(format!(
                "{} exceeds the maximum amount",
                field
            )));
        }

        Ok(())
    }
}
