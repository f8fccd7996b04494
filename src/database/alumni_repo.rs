use sqlx::SqlitePool;

use crate::models::AlumniRow;

const SQL_LIST_ALUMNI: &str = r#"
SELECT id, name, matric, batch, current_company, bio, description,
       instagram, facebook, twitter, linkedin, tiktok, created_at
FROM alumni
ORDER BY created_at DESC
"#;

pub async fn list(pool: &SqlitePool) -> sqlx::Result<Vec<AlumniRow>> {
    sqlx::query_as::<_, AlumniRow>(SQL_LIST_ALUMNI)
        .fetch_all(pool)
        .await
}
