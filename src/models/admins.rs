use serde::Serialize;
use sqlx::FromRow;

/// Row used by admin login and session validation. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct AdminAuthRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
    pub last_login: Option<String>,
}
