pub mod vehicle_controller;

pub use vehicle_controller::configure;
