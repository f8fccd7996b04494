use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::services::{auth_service, ApiError};

pub const USER_SESSION_COOKIE: &str = "portal_session";
pub const ADMIN_SESSION_COOKIE: &str = "portal_admin_session";

/// Validated student session, injected into request extensions by
/// `require_user`. Handlers read this instead of any ambient session state.
#[derive(Clone, Debug)]
pub struct UserSession {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// Validated admin session, injected by `require_admin`.
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub admin_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{cookie_name}=");
    cookies
        .split("; ")
        .find_map(|c| c.strip_prefix(prefix.as_str()))
        .map(|t| t.to_string())
}

pub async fn require_user(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers(), USER_SESSION_COOKIE) else {
        return ApiError::Unauthorized("Unauthorized. Please login first.".to_string())
            .into_response();
    };

    match auth_service::user_by_session(&pool, &token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(UserSession {
                user_id: user.id,
                name: user.name,
                email: user.email,
            });
            next.run(request).await
        }
        Ok(None) => ApiError::Unauthorized("Unauthorized. Please login first.".to_string())
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn require_admin(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers(), ADMIN_SESSION_COOKIE) else {
        return ApiError::unauthorized().into_response();
    };

    match auth_service::admin_by_session(&pool, &token).await {
        Ok(Some(admin)) => {
            request.extensions_mut().insert(AdminSession {
                admin_id: admin.id,
                name: admin.name,
                email: admin.email,
                role: admin.role,
            });
            next.run(request).await
        }
        Ok(None) => ApiError::unauthorized().into_response(),
        Err(e) => e.into_response(),
    }
}
