use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::RngCore;
use sqlx::SqlitePool;

use crate::database::{admin_repo, user_repo};
use crate::models::{AdminAuthRow, UserAuthRow};
use crate::services::ApiError;

const STUDENT_EMAIL_DOMAIN: &str = "@student.utem.edu.my";
const MATRIC_PREFIX: &str = "B03";

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Opaque session token, 32 random bytes hex-encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn is_valid_student_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && email.ends_with(STUDENT_EMAIL_DOMAIN)
}

/// Validates the matric format (B03 followed by at least six digits) and
/// derives the batch year from digits four and five: B032510017 -> 2025.
pub fn parse_matric(matric: &str) -> Option<(String, String)> {
    let matric = matric.trim().to_uppercase();
    let digits = matric.strip_prefix(MATRIC_PREFIX)?;
    if digits.len() < 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let batch = format!("20{}", &digits[..2]);
    Some((matric, batch))
}

pub struct RegisterInput {
    pub name: String,
    pub matric: String,
    pub email: String,
    pub password: String,
    pub program: String,
}

#[derive(Debug)]
pub struct RegisteredUser {
    pub id: i64,
    pub name: String,
    pub matric: String,
    pub email: String,
    pub program: String,
    pub batch: String,
}

pub async fn register(pool: &SqlitePool, input: RegisterInput) -> Result<RegisteredUser, ApiError> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let program = input.program.trim().to_string();

    if name.is_empty() || input.matric.trim().is_empty() || email.is_empty() || program.is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }
    if !is_valid_student_email(&email) {
        return Err(ApiError::BadRequest(format!(
            "Invalid email format. Must be {STUDENT_EMAIL_DOMAIN}"
        )));
    }
    if input.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !program.to_uppercase().contains("BIT") {
        return Err(ApiError::Forbidden(
            "Only BITA students can register".to_string(),
        ));
    }
    let Some((matric, batch)) = parse_matric(&input.matric) else {
        return Err(ApiError::BadRequest(
            "Invalid matric number format. Must start with B03 followed by digits (e.g., B032510017)"
                .to_string(),
        ));
    };

    if user_repo::email_exists(pool, &email, None).await? {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }
    if user_repo::matric_exists(pool, &matric).await? {
        return Err(ApiError::Conflict(
            "Matric number already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let id = user_repo::insert_user(
        pool,
        user_repo::NewUser {
            name: &name,
            matric: &matric,
            email: &email,
            password_hash: &password_hash,
            program: &program,
            batch: Some(&batch),
            is_verified: false,
        },
    )
    .await?;

    tracing::info!(user_id = id, %matric, "user registered, pending approval");

    Ok(RegisteredUser {
        id,
        name,
        matric,
        email,
        program,
        batch,
    })
}

/// Successful login rotates the stored session token, invalidating any
/// previous session for the same account.
pub async fn login(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<(UserAuthRow, String), ApiError> {
    let user = user_repo::find_auth_by_email(pool, email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(password, &user.password) {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }
    if !user.is_verified {
        return Err(ApiError::Forbidden(
            "Your account is pending admin approval. Please wait for verification.".to_string(),
        ));
    }

    let token = generate_session_token();
    user_repo::set_session_token(pool, user.id, Some(&token)).await?;
    Ok((user, token))
}

pub async fn logout(pool: &SqlitePool, user_id: i64) -> Result<(), ApiError> {
    user_repo::set_session_token(pool, user_id, None).await?;
    Ok(())
}

pub async fn user_by_session(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<UserAuthRow>, ApiError> {
    Ok(user_repo::find_by_session_token(pool, token).await?)
}

pub async fn admin_login(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<(AdminAuthRow, String), ApiError> {
    let admin = admin_repo::find_auth_by_email(pool, email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(password, &admin.password) {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = generate_session_token();
    admin_repo::start_session(pool, admin.id, &token).await?;
    Ok((admin, token))
}

pub async fn admin_logout(pool: &SqlitePool, admin_id: i64) -> Result<(), ApiError> {
    admin_repo::clear_session(pool, admin_id).await?;
    Ok(())
}

pub async fn admin_by_session(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<AdminAuthRow>, ApiError> {
    Ok(admin_repo::find_by_session_token(pool, token).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_pool;

    #[test]
    fn matric_parsing_extracts_batch() {
        assert_eq!(
            parse_matric("b032510017"),
            Some(("B032510017".to_string(), "2025".to_string()))
        );
        assert_eq!(parse_matric("B03241001").unwrap().1, "2024");
        assert!(parse_matric("A032510017").is_none());
        assert!(parse_matric("B0325100").is_none()); // too few digits
        assert!(parse_matric("B0325X0017").is_none());
    }

    #[test]
    fn student_email_validation() {
        assert!(is_valid_student_email("b032510017@student.utem.edu.my"));
        assert!(!is_valid_student_email("someone@gmail.com"));
        assert!(!is_valid_student_email("@student.utem.edu.my"));
        assert!(!is_valid_student_email("no-at-sign"));
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    fn valid_input() -> RegisterInput {
        RegisterInput {
            name: "Aina".to_string(),
            matric: "B032510017".to_string(),
            email: "b032510017@student.utem.edu.my".to_string(),
            password: "password123".to_string(),
            program: "BITA".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_requires_approval() {
        let pool = test_pool().await;
        let user = register(&pool, valid_input()).await.unwrap();
        assert_eq!(user.batch, "2025");

        // Unverified accounts cannot log in.
        let err = login(&pool, "b032510017@student.utem.edu.my", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        crate::database::user_repo::approve(&pool, user.id)
            .await
            .unwrap();
        let (row, token) = login(&pool, "b032510017@student.utem.edu.my", "password123")
            .await
            .unwrap();
        assert_eq!(row.id, user.id);

        let found = user_by_session(&pool, &token).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        logout(&pool, user.id).await.unwrap();
        assert!(user_by_session(&pool, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let pool = test_pool().await;
        register(&pool, valid_input()).await.unwrap();

        let mut dup_email = valid_input();
        dup_email.matric = "B032510099".to_string();
        assert!(matches!(
            register(&pool, dup_email).await.unwrap_err(),
            ApiError::Conflict(_)
        ));

        let mut dup_matric = valid_input();
        dup_matric.email = "b032510099@student.utem.edu.my".to_string();
        assert!(matches!(
            register(&pool, dup_matric).await.unwrap_err(),
            ApiError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn register_rejects_non_bita_program() {
        let pool = test_pool().await;
        let mut input = valid_input();
        input.program = "BCS".to_string();
        assert!(matches!(
            register(&pool, input).await.unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn login_rotates_session_token() {
        let pool = test_pool().await;
        let user = register(&pool, valid_input()).await.unwrap();
        crate::database::user_repo::approve(&pool, user.id)
            .await
            .unwrap();

        let (_, first) = login(&pool, "b032510017@student.utem.edu.my", "password123")
            .await
            .unwrap();
        let (_, second) = login(&pool, "b032510017@student.utem.edu.my", "password123")
            .await
            .unwrap();
        assert_ne!(first, second);
        assert!(user_by_session(&pool, &first).await.unwrap().is_none());
        assert!(user_by_session(&pool, &second).await.unwrap().is_some());
    }
}
