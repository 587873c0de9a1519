pub mod auth;
pub mod error_handler;
pub mod request_id;

pub use auth::{AuthenticatedUser, BearerAuth, TokenSigner};
pub use request_id::RequestId;
