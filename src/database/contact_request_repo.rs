use sqlx::{SqliteConnection, SqlitePool};

use crate::models::ContactRequestRow;

const COLUMNS: &str = "id, name, matric, phone, message, status, created_at, resolved_at";

const SQL_INSERT_REQUEST: &str = r#"
INSERT INTO admin_contact_requests (name, matric, phone, message, status)
VALUES (?1, ?2, ?3, ?4, 'Pending')
"#;

pub async fn insert(
    pool: &SqlitePool,
    name: &str,
    matric: &str,
    phone: Option<&str>,
    message: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_REQUEST)
        .bind(name)
        .bind(matric)
        .bind(phone)
        .bind(message)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get(pool: &SqlitePool, request_id: i64) -> sqlx::Result<Option<ContactRequestRow>> {
    let sql = format!("SELECT {COLUMNS} FROM admin_contact_requests WHERE id = ?1");
    sqlx::query_as::<_, ContactRequestRow>(&sql)
        .bind(request_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_REQUESTS: &str = r#"
SELECT id, name, matric, phone, message, status, created_at, resolved_at
FROM admin_contact_requests
ORDER BY created_at DESC, id DESC
"#;

pub async fn list(pool: &SqlitePool) -> sqlx::Result<Vec<ContactRequestRow>> {
    sqlx::query_as::<_, ContactRequestRow>(SQL_LIST_REQUESTS)
        .fetch_all(pool)
        .await
}

const SQL_RESOLVE_PENDING: &str = r#"
UPDATE admin_contact_requests
SET status = 'Resolved', resolved_at = datetime('now')
WHERE id = ?1 AND status = 'Pending'
"#;

pub async fn resolve_pending(pool: &SqlitePool, request_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_RESOLVE_PENDING)
        .bind(request_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Transaction-scoped variant used by the promotion flow.
pub async fn mark_resolved(conn: &mut SqliteConnection, request_id: i64) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE admin_contact_requests SET status = 'Resolved', resolved_at = datetime('now') WHERE id = ?1",
    )
    .bind(request_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, request_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM admin_contact_requests WHERE id = ?1")
        .bind(request_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
