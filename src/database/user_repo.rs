use sqlx::SqlitePool;

use crate::models::{MemberRow, PendingUserRow, UserAuthRow, UserDetailRow, UserListRow};

const AUTH_COLUMNS: &str = "id, name, matric, email, password, program, is_verified";

const DETAIL_COLUMNS: &str = r#"
  id, name, matric, email, program, year, batch, phone, email_alt,
  bio, description, instagram, facebook, twitter, linkedin, tiktok,
  is_verified, verification_comment, created_at, updated_at
"#;

pub async fn find_auth_by_email(
    pool: &SqlitePool,
    email: &str,
) -> sqlx::Result<Option<UserAuthRow>> {
    let sql = format!("SELECT {AUTH_COLUMNS} FROM users WHERE email = ?1");
    sqlx::query_as::<_, UserAuthRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_auth_by_id(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Option<UserAuthRow>> {
    let sql = format!("SELECT {AUTH_COLUMNS} FROM users WHERE id = ?1");
    sqlx::query_as::<_, UserAuthRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_session_token(
    pool: &SqlitePool,
    token: &str,
) -> sqlx::Result<Option<UserAuthRow>> {
    let sql = format!("SELECT {AUTH_COLUMNS} FROM users WHERE session_token = ?1");
    sqlx::query_as::<_, UserAuthRow>(&sql)
        .bind(token)
        .fetch_optional(pool)
        .await
}

pub const SQL_FIND_VERIFIED_ID_BY_MATRIC: &str = r#"
SELECT id FROM users WHERE matric = ?1 AND is_verified = 1 LIMIT 1
"#;

pub async fn find_verified_id_by_matric(
    pool: &SqlitePool,
    matric: &str,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar(SQL_FIND_VERIFIED_ID_BY_MATRIC)
        .bind(matric)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(
    pool: &SqlitePool,
    email: &str,
    exclude_id: Option<i64>,
) -> sqlx::Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2")
            .bind(email)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn matric_exists(pool: &SqlitePool, matric: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE matric = ?1")
        .bind(matric)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub matric: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub program: &'a str,
    pub batch: Option<&'a str>,
    pub is_verified: bool,
}

const SQL_INSERT_USER: &str = r#"
INSERT INTO users (name, matric, email, password, program, batch, is_verified)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub async fn insert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_USER)
        .bind(user.name)
        .bind(user.matric)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.program)
        .bind(user.batch)
        .bind(user.is_verified)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn set_session_token(
    pool: &SqlitePool,
    user_id: i64,
    token: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET session_token = ?1 WHERE id = ?2")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_LIST_PENDING_USERS: &str = r#"
SELECT id, name, matric, email, program, is_verified, created_at
FROM users
WHERE is_verified = 0
ORDER BY created_at ASC
"#;

pub async fn list_pending(pool: &SqlitePool) -> sqlx::Result<Vec<PendingUserRow>> {
    sqlx::query_as::<_, PendingUserRow>(SQL_LIST_PENDING_USERS)
        .fetch_all(pool)
        .await
}

const SQL_LIST_VERIFIED_USERS: &str = r#"
SELECT id, name, matric, email, program, is_verified, created_at, updated_at
FROM users
WHERE is_verified = 1
ORDER BY created_at DESC
"#;

pub async fn list_verified(pool: &SqlitePool) -> sqlx::Result<Vec<UserListRow>> {
    sqlx::query_as::<_, UserListRow>(SQL_LIST_VERIFIED_USERS)
        .fetch_all(pool)
        .await
}

const SQL_LIST_MEMBERS: &str = r#"
SELECT id, name, matric, email, program, year, batch, phone, email_alt,
       bio, description, instagram, facebook, twitter, linkedin, tiktok,
       created_at
FROM users
WHERE is_verified = 1
ORDER BY year DESC, name ASC
"#;

pub async fn list_members(pool: &SqlitePool) -> sqlx::Result<Vec<MemberRow>> {
    sqlx::query_as::<_, MemberRow>(SQL_LIST_MEMBERS)
        .fetch_all(pool)
        .await
}

pub async fn get_detail(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Option<UserDetailRow>> {
    let sql = format!("SELECT {DETAIL_COLUMNS} FROM users WHERE id = ?1");
    sqlx::query_as::<_, UserDetailRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_APPROVE_USER: &str = r#"
UPDATE users
SET is_verified = 1,
    verification_comment = NULL,
    updated_at = datetime('now')
WHERE id = ?1
"#;

pub async fn approve(pool: &SqlitePool, user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_APPROVE_USER)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, user_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Partial update: NULL parameters keep the current value.
pub struct UserUpdate<'a> {
    pub name: Option<&'a str>,
    pub matric: Option<&'a str>,
    pub email: Option<&'a str>,
    pub program: Option<&'a str>,
    pub year: Option<&'a str>,
    pub batch: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email_alt: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub description: Option<&'a str>,
    pub instagram: Option<&'a str>,
    pub facebook: Option<&'a str>,
    pub twitter: Option<&'a str>,
    pub linkedin: Option<&'a str>,
    pub tiktok: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

const SQL_UPDATE_USER: &str = r#"
UPDATE users SET
  name = COALESCE(?1, name),
  matric = COALESCE(?2, matric),
  email = COALESCE(?3, email),
  program = COALESCE(?4, program),
  year = COALESCE(?5, year),
  batch = COALESCE(?6, batch),
  phone = COALESCE(?7, phone),
  email_alt = COALESCE(?8, email_alt),
  bio = COALESCE(?9, bio),
  description = COALESCE(?10, description),
  instagram = COALESCE(?11, instagram),
  facebook = COALESCE(?12, facebook),
  twitter = COALESCE(?13, twitter),
  linkedin = COALESCE(?14, linkedin),
  tiktok = COALESCE(?15, tiktok),
  password = COALESCE(?16, password),
  updated_at = datetime('now')
WHERE id = ?17
"#;

pub async fn update(pool: &SqlitePool, user_id: i64, update: UserUpdate<'_>) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_UPDATE_USER)
        .bind(update.name)
        .bind(update.matric)
        .bind(update.email)
        .bind(update.program)
        .bind(update.year)
        .bind(update.batch)
        .bind(update.phone)
        .bind(update.email_alt)
        .bind(update.bio)
        .bind(update.description)
        .bind(update.instagram)
        .bind(update.facebook)
        .bind(update.twitter)
        .bind(update.linkedin)
        .bind(update.tiktok)
        .bind(update.password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_pending(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_verified = 0")
        .fetch_one(pool)
        .await
}

pub async fn count_verified(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_verified = 1")
        .fetch_one(pool)
        .await
}
