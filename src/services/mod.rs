pub mod admin_service;
pub mod auth_service;
pub mod contact_service;
pub mod conversation_service;
pub mod error;
pub mod user_service;

pub use error::ApiError;
