pub mod installment_repository;
pub mod payment_repository;

pub use installment_repository::{InstallmentRepository, InstallmentStore};
pub use payment_repository::PaymentRepository;
