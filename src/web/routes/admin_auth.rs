use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{auth_service, ApiError};
use crate::web::middleware::auth::{session_token, AdminSession, ADMIN_SESSION_COOKIE};
use crate::web::routes::{expired_session_cookie, session_cookie};

#[derive(Deserialize)]
pub struct AdminLoginBody {
    email: String,
    password: String,
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<AdminLoginBody>,
) -> Result<Response, ApiError> {
    let (admin, token) = auth_service::admin_login(&pool, &body.email, &body.password).await?;
    tracing::info!(admin_id = admin.id, "admin logged in");

    let mut response = Json(json!({
        "success": true,
        "message": "Login successful",
        "admin": {
            "id": admin.id,
            "name": admin.name,
            "email": admin.email,
            "role": admin.role,
        }
    }))
    .into_response();

    response.headers_mut().append(
        header::SET_COOKIE,
        session_cookie(ADMIN_SESSION_COOKIE, token)
            .to_string()
            .parse()
            .map_err(|_| ApiError::Internal("invalid cookie header".to_string()))?,
    );
    Ok(response)
}

pub async fn logout_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
) -> Result<Response, ApiError> {
    auth_service::admin_logout(&pool, session.admin_id).await?;

    let mut response = Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
    .into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        expired_session_cookie(ADMIN_SESSION_COOKIE)
            .to_string()
            .parse()
            .map_err(|_| ApiError::Internal("invalid cookie header".to_string()))?,
    );
    Ok(response)
}

/// Public: revalidates the stored token, reports `authenticated: false` on
/// any mismatch instead of erroring.
pub async fn session_handler(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = session_token(&headers, ADMIN_SESSION_COOKIE) else {
        return Ok(Json(json!({ "success": true, "authenticated": false })));
    };

    match auth_service::admin_by_session(&pool, &token).await? {
        Some(admin) => Ok(Json(json!({
            "success": true,
            "authenticated": true,
            "admin": {
                "id": admin.id,
                "name": admin.name,
                "email": admin.email,
                "role": admin.role,
            }
        }))),
        None => Ok(Json(json!({ "success": true, "authenticated": false }))),
    }
}
