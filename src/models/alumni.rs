use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlumniRow {
    pub id: i64,
    pub name: String,
    pub matric: Option<String>,
    pub batch: Option<String>,
    pub current_company: Option<String>,
    pub bio: Option<String>,
    pub description: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub created_at: String,
}
