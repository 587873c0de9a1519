// Bookings module: booking workflow and the schedules produced by confirmation

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Booking, BookingDetails, BookingStatus, Schedule, ScheduleStatus};
pub use repositories::{BookingRepository, ScheduleRepository};
pub use services::BookingService;
