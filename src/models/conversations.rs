use serde::Serialize;
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub id: i64,
    pub user_id: i64,
    pub admin_id: Option<i64>,
    pub status: String,
    pub last_message_at: Option<String>,
    pub created_at: String,
}

/// Inbox entry for the admin message-requests view: a pending conversation
/// joined with the owning user plus a last-message preview and unread count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingConversationRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_matric: String,
    pub user_email: String,
    pub user_program: String,
    pub status: String,
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
    pub unread_count: i64,
    pub created_at: String,
}
