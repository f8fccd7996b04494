use serde::Serialize;
use sqlx::FromRow;

pub const SENDER_USER: &str = "user";
pub const SENDER_ADMIN: &str = "admin";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub sender_type: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}
