pub mod user;

pub use user::{LoginRequest, LoginResponse, RegisterUserRequest, Role, User, UserResponse};
