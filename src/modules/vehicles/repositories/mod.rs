pub mod vehicle_image_repository;
pub mod vehicle_repository;

pub use vehicle_image_repository::VehicleImageRepository;
pub use vehicle_repository::VehicleRepository;
