pub mod installment_calculator;
pub mod payment_service;
pub mod penalty_checker;

pub use installment_calculator::InstallmentCalculator;
pub use payment_service::PaymentService;
pub use penalty_checker::{PenaltyChecker, PenaltyRunReport};
