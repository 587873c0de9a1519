// Payments module: payment records, installment plans and overdue penalties

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Installment, InstallmentStatus, Payment, PaymentMethod, PaymentStatus};
pub use repositories::{InstallmentRepository, InstallmentStore, PaymentRepository};
pub use services::{InstallmentCalculator, PaymentService, PenaltyChecker};
