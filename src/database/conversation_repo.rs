use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ConversationRow, PendingConversationRow};

const COLUMNS: &str = "id, user_id, admin_id, status, last_message_at, created_at";

pub async fn get(pool: &SqlitePool, conversation_id: i64) -> sqlx::Result<Option<ConversationRow>> {
    let sql = format!("SELECT {COLUMNS} FROM conversations WHERE id = ?1");
    sqlx::query_as::<_, ConversationRow>(&sql)
        .bind(conversation_id)
        .fetch_optional(pool)
        .await
}

pub const SQL_LIST_PENDING_WITH_USER: &str = r#"
SELECT
  c.id,
  c.user_id,
  u.name AS user_name,
  u.matric AS user_matric,
  u.email AS user_email,
  u.program AS user_program,
  c.status,
  (SELECT message FROM messages
   WHERE conversation_id = c.id
   ORDER BY created_at DESC, id DESC LIMIT 1) AS last_message,
  (SELECT created_at FROM messages
   WHERE conversation_id = c.id
   ORDER BY created_at DESC, id DESC LIMIT 1) AS last_message_time,
  (SELECT COUNT(*) FROM messages
   WHERE conversation_id = c.id AND is_read = 0 AND sender_type = 'user') AS unread_count,
  c.created_at
FROM conversations c
INNER JOIN users u ON c.user_id = u.id
WHERE c.status = 'pending'
ORDER BY c.last_message_at DESC, c.created_at DESC
"#;

pub async fn list_pending_with_user(
    pool: &SqlitePool,
) -> sqlx::Result<Vec<PendingConversationRow>> {
    sqlx::query_as::<_, PendingConversationRow>(SQL_LIST_PENDING_WITH_USER)
        .fetch_all(pool)
        .await
}

const SQL_CLAIM: &str = r#"
UPDATE conversations
SET admin_id = ?1, status = 'active'
WHERE id = ?2 AND status = 'pending' AND admin_id IS NULL
"#;

/// Conditional claim: the WHERE clause carries the precondition, so a
/// concurrent claim shows up as zero affected rows instead of a lost update.
pub async fn claim(pool: &SqlitePool, conversation_id: i64, admin_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_CLAIM)
        .bind(admin_id)
        .bind(conversation_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

const SQL_FIND_ACTIVE_BETWEEN: &str = r#"
SELECT id FROM conversations
WHERE user_id = ?1 AND admin_id = ?2 AND status = 'active'
LIMIT 1
"#;

pub async fn find_active_between(
    pool: &SqlitePool,
    user_id: i64,
    admin_id: i64,
) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar(SQL_FIND_ACTIVE_BETWEEN)
        .bind(user_id)
        .bind(admin_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_ACTIVE: &str = r#"
INSERT INTO conversations (user_id, admin_id, status, last_message_at)
VALUES (?1, ?2, 'active', datetime('now'))
"#;

/// Transaction-scoped: promotion creates the conversation already claimed.
pub async fn insert_active(
    conn: &mut SqliteConnection,
    user_id: i64,
    admin_id: i64,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_ACTIVE)
        .bind(user_id)
        .bind(admin_id)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

const SQL_INSERT_PENDING: &str = r#"
INSERT INTO conversations (user_id, status, last_message_at)
VALUES (?1, 'pending', datetime('now'))
"#;

pub async fn insert_pending(pool: &SqlitePool, user_id: i64) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_PENDING)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

const SQL_FIND_OPEN_FOR_USER: &str = r#"
SELECT id, user_id, admin_id, status, last_message_at, created_at
FROM conversations
WHERE user_id = ?1 AND status != 'closed'
ORDER BY created_at DESC
LIMIT 1
"#;

pub async fn find_open_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> sqlx::Result<Option<ConversationRow>> {
    sqlx::query_as::<_, ConversationRow>(SQL_FIND_OPEN_FOR_USER)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn touch_last_message(pool: &SqlitePool, conversation_id: i64) -> sqlx::Result<()> {
    sqlx::query("UPDATE conversations SET last_message_at = datetime('now') WHERE id = ?1")
        .bind(conversation_id)
        .execute(pool)
        .await?;
    Ok(())
}
