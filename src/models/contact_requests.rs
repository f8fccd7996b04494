use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactRequestRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
}
