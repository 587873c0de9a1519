// Agreements module: binding contracts for confirmed bookings

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Agreement, PaymentType};
pub use repositories::AgreementRepository;
pub use services::{AgreementService, PaymentCreator};
