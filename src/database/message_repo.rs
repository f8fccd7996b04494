use sqlx::{SqliteConnection, SqlitePool};

use crate::models::MessageRow;

const SQL_INSERT_MESSAGE: &str = r#"
INSERT INTO messages (conversation_id, sender_id, sender_type, message)
VALUES (?1, ?2, ?3, ?4)
"#;

pub async fn insert(
    pool: &SqlitePool,
    conversation_id: i64,
    sender_id: i64,
    sender_type: &str,
    message: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_MESSAGE)
        .bind(conversation_id)
        .bind(sender_id)
        .bind(sender_type)
        .bind(message)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Transaction-scoped variant used by the promotion flow to seed the
/// conversation with the original request text.
pub async fn insert_in_tx(
    conn: &mut SqliteConnection,
    conversation_id: i64,
    sender_id: i64,
    sender_type: &str,
    message: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_MESSAGE)
        .bind(conversation_id)
        .bind(sender_id)
        .bind(sender_type)
        .bind(message)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

const SQL_LIST_MESSAGES: &str = r#"
SELECT id, sender_id, sender_type, message, is_read, created_at
FROM messages
WHERE conversation_id = ?1
ORDER BY created_at ASC, id ASC
"#;

pub async fn list(pool: &SqlitePool, conversation_id: i64) -> sqlx::Result<Vec<MessageRow>> {
    sqlx::query_as::<_, MessageRow>(SQL_LIST_MESSAGES)
        .bind(conversation_id)
        .fetch_all(pool)
        .await
}

const SQL_MARK_READ: &str = r#"
UPDATE messages
SET is_read = 1
WHERE conversation_id = ?1 AND sender_type = ?2 AND is_read = 0
"#;

/// Marks every unread message from the given sender side as read and
/// reports how many rows changed.
pub async fn mark_read(
    pool: &SqlitePool,
    conversation_id: i64,
    sender_type: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query(SQL_MARK_READ)
        .bind(conversation_id)
        .bind(sender_type)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_for_conversation(
    pool: &SqlitePool,
    conversation_id: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = ?1")
        .bind(conversation_id)
        .fetch_one(pool)
        .await
}
