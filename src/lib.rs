//! Mobigo vehicle commerce backend
//!
//! Customers book vehicles, staff confirm viewing schedules, confirmed bookings
//! become agreements, and agreements are settled by a full payment or an
//! installment plan whose overdue bills accrue a daily penalty.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::agreements;
pub use modules::bookings;
pub use modules::payments;
pub use modules::users;
pub use modules::vehicles;
