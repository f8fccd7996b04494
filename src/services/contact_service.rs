use sqlx::SqlitePool;

use crate::database::{contact_request_repo, user_repo};
use crate::models::ContactRequestRow;
use crate::services::ApiError;

const MAX_PHONE_LEN: usize = 20;

/// Files a contact request on behalf of the logged-in student. Name and
/// matric come from the user row, never from the client; an empty phone is
/// stored as NULL.
pub async fn submit(
    pool: &SqlitePool,
    user_id: i64,
    message: &str,
    phone: Option<&str>,
) -> Result<i64, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let phone = phone.map(str::trim).filter(|p| !p.is_empty());
    if let Some(phone) = phone {
        if phone.len() > MAX_PHONE_LEN {
            return Err(ApiError::BadRequest(
                "Phone number is too long. Maximum 20 characters.".to_string(),
            ));
        }
    }

    let user = user_repo::find_auth_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let request_id =
        contact_request_repo::insert(pool, &user.name, &user.matric, phone, message).await?;
    tracing::info!(request_id, user_id, "contact request submitted");
    Ok(request_id)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<ContactRequestRow>, ApiError> {
    Ok(contact_request_repo::list(pool).await?)
}

pub async fn resolve(pool: &SqlitePool, request_id: i64) -> Result<(), ApiError> {
    let affected = contact_request_repo::resolve_pending(pool, request_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(
            "Request not found or already resolved".to_string(),
        ));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, request_id: i64) -> Result<(), ApiError> {
    let affected = contact_request_repo::delete(pool, request_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Request not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_user, test_pool};

    #[tokio::test]
    async fn submit_copies_identity_from_user_row() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", true).await;

        let id = submit(&pool, user, "  Need help  ", Some("0123456789"))
            .await
            .unwrap();
        let row = crate::database::contact_request_repo::get(&pool, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.matric, "B032510017");
        assert_eq!(row.message, "Need help");
        assert_eq!(row.phone.as_deref(), Some("0123456789"));
        assert_eq!(row.status, "Pending");
    }

    #[tokio::test]
    async fn submit_validates_message_and_phone() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", true).await;

        assert!(matches!(
            submit(&pool, user, "   ", None).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            submit(&pool, user, "hi", Some("012345678901234567890"))
                .await
                .unwrap_err(),
            ApiError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn resolve_is_single_shot() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", true).await;
        let id = submit(&pool, user, "question", None).await.unwrap();

        resolve(&pool, id).await.unwrap();
        assert!(matches!(
            resolve(&pool, id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));

        delete(&pool, id).await.unwrap();
        assert!(matches!(
            delete(&pool, id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
