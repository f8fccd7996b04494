use sqlx::SqlitePool;

use crate::models::{AdminAuthRow, AdminRow};

const AUTH_COLUMNS: &str = "id, name, email, password, role";

pub async fn find_auth_by_email(
    pool: &SqlitePool,
    email: &str,
) -> sqlx::Result<Option<AdminAuthRow>> {
    let sql = format!("SELECT {AUTH_COLUMNS} FROM admins WHERE email = ?1");
    sqlx::query_as::<_, AdminAuthRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_session_token(
    pool: &SqlitePool,
    token: &str,
) -> sqlx::Result<Option<AdminAuthRow>> {
    let sql = format!("SELECT {AUTH_COLUMNS} FROM admins WHERE session_token = ?1");
    sqlx::query_as::<_, AdminAuthRow>(&sql)
        .bind(token)
        .fetch_optional(pool)
        .await
}

const SQL_START_SESSION: &str = r#"
UPDATE admins SET session_token = ?1, last_login = datetime('now') WHERE id = ?2
"#;

pub async fn start_session(pool: &SqlitePool, admin_id: i64, token: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_START_SESSION)
        .bind(token)
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn clear_session(pool: &SqlitePool, admin_id: i64) -> sqlx::Result<()> {
    sqlx::query("UPDATE admins SET session_token = NULL WHERE id = ?1")
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_LIST_ADMINS: &str = r#"
SELECT id, name, email, role, created_at, last_login
FROM admins
ORDER BY created_at DESC
"#;

pub async fn list(pool: &SqlitePool) -> sqlx::Result<Vec<AdminRow>> {
    sqlx::query_as::<_, AdminRow>(SQL_LIST_ADMINS)
        .fetch_all(pool)
        .await
}

pub async fn get_role(pool: &SqlitePool, admin_id: i64) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar("SELECT role FROM admins WHERE id = ?1")
        .bind(admin_id)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(
    pool: &SqlitePool,
    email: &str,
    exclude_id: Option<i64>,
) -> sqlx::Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE email = ?1 AND id != ?2")
            .bind(email)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

const SQL_INSERT_ADMIN: &str = r#"
INSERT INTO admins (name, email, password, role) VALUES (?1, ?2, ?3, ?4)
"#;

pub async fn insert(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_ADMIN)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

const SQL_UPDATE_ADMIN: &str = r#"
UPDATE admins SET
  name = ?1,
  email = ?2,
  role = ?3,
  password = COALESCE(?4, password)
WHERE id = ?5
"#;

pub async fn update(
    pool: &SqlitePool,
    admin_id: i64,
    name: &str,
    email: &str,
    role: &str,
    password_hash: Option<&str>,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_UPDATE_ADMIN)
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(password_hash)
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, admin_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM admins WHERE id = ?1")
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
