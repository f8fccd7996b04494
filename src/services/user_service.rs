use sqlx::SqlitePool;

use crate::database::{alumni_repo, user_repo};
use crate::models::{AlumniRow, MemberRow, PendingUserRow, UserDetailRow, UserListRow};
use crate::services::{auth_service, ApiError};

pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<PendingUserRow>, ApiError> {
    Ok(user_repo::list_pending(pool).await?)
}

pub async fn approve(pool: &SqlitePool, user_id: i64) -> Result<(), ApiError> {
    let affected = user_repo::approve(pool, user_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    tracing::info!(user_id, "user approved");
    Ok(())
}

#[derive(Debug)]
pub struct RejectedUser {
    pub name: String,
    pub email: String,
    pub matric: String,
}

/// Rejection removes the account entirely; the returned identity lets the
/// route echo who was removed. (Notification email is out of scope.)
pub async fn reject(pool: &SqlitePool, user_id: i64) -> Result<RejectedUser, ApiError> {
    let user = user_repo::get_detail(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    user_repo::delete(pool, user_id).await?;
    tracing::info!(user_id, matric = %user.matric, "user rejected and removed");

    Ok(RejectedUser {
        name: user.name,
        email: user.email,
        matric: user.matric,
    })
}

pub async fn list_verified(pool: &SqlitePool) -> Result<Vec<UserListRow>, ApiError> {
    Ok(user_repo::list_verified(pool).await?)
}

pub async fn get(pool: &SqlitePool, user_id: i64) -> Result<UserDetailRow, ApiError> {
    user_repo::get_detail(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Profile view for other users: verified accounts only.
pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> Result<UserDetailRow, ApiError> {
    let user = user_repo::get_detail(pool, user_id)
        .await?
        .filter(|u| u.is_verified)
        .ok_or_else(|| ApiError::NotFound("User not found or not verified".to_string()))?;
    Ok(user)
}

pub struct AddUserInput {
    pub name: String,
    pub matric: String,
    pub email: String,
    pub password: String,
    pub program: String,
    pub is_verified: bool,
}

/// Admin-created account: same validations as self-registration, but
/// verified by default.
pub async fn add(pool: &SqlitePool, input: AddUserInput) -> Result<i64, ApiError> {
    let name = input.name.trim().to_string();
    let matric = input.matric.trim().to_uppercase();
    let email = input.email.trim().to_string();
    let program = input.program.trim().to_string();

    if name.is_empty() || matric.is_empty() || email.is_empty() || program.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }
    if !auth_service::is_valid_student_email(&email) {
        return Err(ApiError::BadRequest(
            "Invalid email format. Must be @student.utem.edu.my".to_string(),
        ));
    }
    if input.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if user_repo::email_exists(pool, &email, None).await? {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }
    if user_repo::matric_exists(pool, &matric).await? {
        return Err(ApiError::BadRequest(
            "Matric number already exists".to_string(),
        ));
    }

    let password_hash = auth_service::hash_password(&input.password)?;
    let id = user_repo::insert_user(
        pool,
        user_repo::NewUser {
            name: &name,
            matric: &matric,
            email: &email,
            password_hash: &password_hash,
            program: &program,
            batch: None,
            is_verified: input.is_verified,
        },
    )
    .await?;
    Ok(id)
}

#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub matric: Option<String>,
    pub email: Option<String>,
    pub program: Option<String>,
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
    pub password: Option<String>,
}

/// Partial update: absent fields keep their current value.
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    input: UpdateUserInput,
) -> Result<(), ApiError> {
    if user_repo::get_detail(pool, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if let Some(email) = input.email.as_deref() {
        if !auth_service::is_valid_student_email(email) {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }
        if user_repo::email_exists(pool, email, Some(user_id)).await? {
            return Err(ApiError::BadRequest("Email already exists".to_string()));
        }
    }

    let password_hash = match input.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(auth_service::hash_password(password)?),
        None => None,
    };

    user_repo::update(
        pool,
        user_id,
        user_repo::UserUpdate {
            name: input.name.as_deref(),
            matric: input.matric.as_deref(),
            email: input.email.as_deref(),
            program: input.program.as_deref(),
            year: input.year.as_deref(),
            batch: input.batch.as_deref(),
            phone: input.phone.as_deref(),
            email_alt: input.email_alt.as_deref(),
            bio: input.bio.as_deref(),
            description: input.description.as_deref(),
            instagram: input.instagram.as_deref(),
            facebook: input.facebook.as_deref(),
            twitter: input.twitter.as_deref(),
            linkedin: input.linkedin.as_deref(),
            tiktok: input.tiktok.as_deref(),
            password_hash: password_hash.as_deref(),
        },
    )
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, user_id: i64) -> Result<(), ApiError> {
    let affected = user_repo::delete(pool, user_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    Ok(())
}

pub struct Stats {
    pub pending_count: i64,
    pub total_users: i64,
}

pub async fn stats(pool: &SqlitePool) -> Result<Stats, ApiError> {
    Ok(Stats {
        pending_count: user_repo::count_pending(pool).await?,
        total_users: user_repo::count_verified(pool).await?,
    })
}

pub async fn list_members(pool: &SqlitePool) -> Result<Vec<MemberRow>, ApiError> {
    Ok(user_repo::list_members(pool).await?)
}

pub async fn list_alumni(pool: &SqlitePool) -> Result<Vec<AlumniRow>, ApiError> {
    Ok(alumni_repo::list(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_user, test_pool};

    #[tokio::test]
    async fn approval_pipeline_moves_user_out_of_pending() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", false).await;

        let pending = list_pending(&pool).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, user);

        approve(&pool, user).await.unwrap();
        assert!(list_pending(&pool).await.unwrap().is_empty());
        assert_eq!(list_verified(&pool).await.unwrap().len(), 1);

        let stats = stats(&pool).await.unwrap();
        assert_eq!(stats.pending_count, 0);
        assert_eq!(stats.total_users, 1);
    }

    #[tokio::test]
    async fn reject_removes_the_account() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", false).await;

        let rejected = reject(&pool, user).await.unwrap();
        assert_eq!(rejected.matric, "B032510017");
        assert!(matches!(
            get(&pool, user).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            reject(&pool, user).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn profile_hides_unverified_users() {
        let pool = test_pool().await;
        let unverified = seed_user(&pool, "B032510017", false).await;
        let verified = seed_user(&pool, "B032510018", true).await;

        assert!(matches!(
            get_profile(&pool, unverified).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert_eq!(get_profile(&pool, verified).await.unwrap().id, verified);
    }

    #[tokio::test]
    async fn partial_update_keeps_existing_fields() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", true).await;

        update(
            &pool,
            user,
            UpdateUserInput {
                bio: Some("hello".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let detail = get(&pool, user).await.unwrap();
        assert_eq!(detail.bio.as_deref(), Some("hello"));
        assert_eq!(detail.matric, "B032510017");

        let err = update(
            &pool,
            user,
            UpdateUserInput {
                email: Some("bad-email".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
