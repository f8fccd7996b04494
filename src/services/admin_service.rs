use sqlx::SqlitePool;

use crate::database::admin_repo;
use crate::models::AdminRow;
use crate::services::{auth_service, ApiError};

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_MODERATOR: &str = "moderator";

fn require_superadmin(role: &str) -> Result<(), ApiError> {
    if role != ROLE_SUPERADMIN {
        return Err(ApiError::Forbidden(
            "Access denied. Superadmin only.".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(pool: &SqlitePool, caller_role: &str) -> Result<Vec<AdminRow>, ApiError> {
    require_superadmin(caller_role)?;
    Ok(admin_repo::list(pool).await?)
}

pub struct SaveAdminInput {
    /// None creates a new admin, Some updates an existing one.
    pub admin_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: Option<String>,
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Create-or-update, superadmin only. Other superadmins are untouchable and
/// a superadmin cannot demote themselves (lockout guard).
pub async fn save(
    pool: &SqlitePool,
    caller_id: i64,
    caller_role: &str,
    input: SaveAdminInput,
) -> Result<i64, ApiError> {
    require_superadmin(caller_role)?;

    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let role = input.role.trim().to_string();

    if name.is_empty() || email.is_empty() {
        return Err(ApiError::BadRequest(
            "Name and email are required".to_string(),
        ));
    }
    if !is_plausible_email(&email) {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }
    if role != ROLE_SUPERADMIN && role != ROLE_MODERATOR {
        return Err(ApiError::BadRequest("Invalid role".to_string()));
    }
    if let Some(password) = input.password.as_deref() {
        if password.len() < 8 {
            return Err(ApiError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }
    }

    match input.admin_id {
        None => {
            let Some(password) = input.password.as_deref() else {
                return Err(ApiError::BadRequest(
                    "Password is required for new admin".to_string(),
                ));
            };
            if admin_repo::email_exists(pool, &email, None).await? {
                return Err(ApiError::BadRequest("Email already exists".to_string()));
            }
            let password_hash = auth_service::hash_password(password)?;
            let id = admin_repo::insert(pool, &name, &email, &password_hash, &role).await?;
            tracing::info!(admin_id = id, %role, "admin created");
            Ok(id)
        }
        Some(admin_id) => {
            let target_role = admin_repo::get_role(pool, admin_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

            if target_role == ROLE_SUPERADMIN && admin_id != caller_id {
                return Err(ApiError::Forbidden(
                    "Cannot edit other super admins".to_string(),
                ));
            }
            if admin_id == caller_id && role != ROLE_SUPERADMIN {
                return Err(ApiError::BadRequest(
                    "Cannot change your own role from superadmin".to_string(),
                ));
            }
            if admin_repo::email_exists(pool, &email, Some(admin_id)).await? {
                return Err(ApiError::BadRequest("Email already exists".to_string()));
            }

            let password_hash = match input.password.as_deref() {
                Some(password) => Some(auth_service::hash_password(password)?),
                None => None,
            };
            admin_repo::update(pool, admin_id, &name, &email, &role, password_hash.as_deref())
                .await?;
            tracing::info!(admin_id, %role, "admin updated");
            Ok(admin_id)
        }
    }
}

pub async fn delete(
    pool: &SqlitePool,
    caller_id: i64,
    caller_role: &str,
    admin_id: i64,
) -> Result<(), ApiError> {
    require_superadmin(caller_role)?;

    if admin_id == caller_id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }
    let target_role = admin_repo::get_role(pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;
    if target_role == ROLE_SUPERADMIN {
        return Err(ApiError::Forbidden(
            "Cannot delete other super admins".to_string(),
        ));
    }

    admin_repo::delete(pool, admin_id).await?;
    tracing::info!(admin_id, "admin deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_admin, test_pool};

    fn new_admin_input(email: &str, role: &str) -> SaveAdminInput {
        SaveAdminInput {
            admin_id: None,
            name: "New Admin".to_string(),
            email: email.to_string(),
            role: role.to_string(),
            password: Some("password123".to_string()),
        }
    }

    #[tokio::test]
    async fn moderators_cannot_manage_admins() {
        let pool = test_pool().await;
        let moderator = seed_admin(&pool, ROLE_MODERATOR).await;

        assert!(matches!(
            list(&pool, ROLE_MODERATOR).await.unwrap_err(),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            save(
                &pool,
                moderator,
                ROLE_MODERATOR,
                new_admin_input("x@portal.edu", ROLE_MODERATOR)
            )
            .await
            .unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn superadmin_guard_rails() {
        let pool = test_pool().await;
        let boss = seed_admin(&pool, ROLE_SUPERADMIN).await;
        let other_boss = seed_admin(&pool, ROLE_SUPERADMIN).await;
        let moderator = seed_admin(&pool, ROLE_MODERATOR).await;

        // Cannot edit another superadmin.
        let err = save(
            &pool,
            boss,
            ROLE_SUPERADMIN,
            SaveAdminInput {
                admin_id: Some(other_boss),
                name: "X".to_string(),
                email: "x@portal.edu".to_string(),
                role: ROLE_MODERATOR.to_string(),
                password: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // Cannot demote yourself.
        let err = save(
            &pool,
            boss,
            ROLE_SUPERADMIN,
            SaveAdminInput {
                admin_id: Some(boss),
                name: "Me".to_string(),
                email: "me@portal.edu".to_string(),
                role: ROLE_MODERATOR.to_string(),
                password: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        // Cannot delete yourself or another superadmin; moderators are fair game.
        assert!(delete(&pool, boss, ROLE_SUPERADMIN, boss).await.is_err());
        assert!(delete(&pool, boss, ROLE_SUPERADMIN, other_boss)
            .await
            .is_err());
        delete(&pool, boss, ROLE_SUPERADMIN, moderator).await.unwrap();
    }

    #[tokio::test]
    async fn create_requires_password_and_unique_email() {
        let pool = test_pool().await;
        let boss = seed_admin(&pool, ROLE_SUPERADMIN).await;

        let mut input = new_admin_input("mod@portal.edu", ROLE_MODERATOR);
        input.password = None;
        assert!(matches!(
            save(&pool, boss, ROLE_SUPERADMIN, input).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));

        save(
            &pool,
            boss,
            ROLE_SUPERADMIN,
            new_admin_input("mod@portal.edu", ROLE_MODERATOR),
        )
        .await
        .unwrap();
        assert!(matches!(
            save(
                &pool,
                boss,
                ROLE_SUPERADMIN,
                new_admin_input("mod@portal.edu", ROLE_MODERATOR)
            )
            .await
            .unwrap_err(),
            ApiError::BadRequest(_)
        ));
    }
}
