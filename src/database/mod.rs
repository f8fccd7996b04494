pub mod admin_repo;
pub mod alumni_repo;
pub mod contact_request_repo;
pub mod conversation_repo;
pub mod message_repo;
pub mod user_repo;
