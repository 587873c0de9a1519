pub mod installment;
pub mod payment;
pub mod plan;

pub use installment::{days_late, Installment, InstallmentStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use plan::{GeneratePlanRequest, InstallmentPlanSummary, InstallmentQuote};
