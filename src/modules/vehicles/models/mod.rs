pub mod vehicle;
pub mod vehicle_image;

pub use vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleStatus};
pub use vehicle_image::{CreateVehicleImageRequest, VehicleImage};
