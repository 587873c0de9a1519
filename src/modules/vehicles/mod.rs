// Vehicles module: catalogue, image records and the vehicle status ledger

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Vehicle, VehicleImage, VehicleStatus};
pub use repositories::{VehicleImageRepository, VehicleRepository};
pub use services::VehicleService;
