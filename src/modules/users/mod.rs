// Users module: registration, login and role lookup

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Role, User};
pub use repositories::UserRepository;
pub use services::UserService;
