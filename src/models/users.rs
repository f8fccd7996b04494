use serde::Serialize;
use sqlx::FromRow;

/// Row used by login and session validation. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserAuthRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub password: String,
    pub program: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserListRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub program: String,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingUserRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub program: String,
    pub is_verified: bool,
    pub created_at: String,
}

/// Full public profile, used by the admin detail view and the
/// user-facing profile endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDetailRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub program: String,
    pub year: Option<String>,
    pub batch: Option<String>,
    pub phone: Option<String>,
    pub email_alt: Option<String>,
    pub bio: Option<String>,
    pub description: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub is_verified: bool,
    pub verification_comment: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Directory entry for the public members listing (verified users only,
/// no approval metadata).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberRow {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub program: String,
    pub year: Option<String>,
    pub batch: Option<String>,
    pub phone: Option<String>,
    pub email_alt: Option<String>,
    pub bio: Option<String>,
    pub description: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub created_at: String,
}
