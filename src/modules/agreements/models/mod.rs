pub mod agreement;

pub use agreement::{Agreement, CreateAgreementRequest, PaymentType};
