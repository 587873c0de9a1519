pub mod agreement_service;
pub mod payment_creator;

pub use agreement_service::AgreementService;
pub use payment_creator::PaymentCreator;
