use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{auth_service, ApiError};
use crate::web::middleware::auth::{session_token, UserSession, USER_SESSION_COOKIE};
use crate::web::routes::{expired_session_cookie, session_cookie};

#[derive(Deserialize)]
pub struct RegisterBody {
    name: String,
    matric: String,
    email: String,
    password: String,
    program: String,
}

pub async fn register_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<RegisterBody>,
) -> Result<Response, ApiError> {
    let user = auth_service::register(
        &pool,
        auth_service::RegisterInput {
            name: body.name,
            matric: body.matric,
            email: body.email,
            password: body.password,
            program: body.program,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration submitted successfully. Your account is pending admin approval before you can login.",
            "user": {
                "id": user.id,
                "name": user.name,
                "matric": user.matric,
                "email": user.email,
                "program": user.program,
                "batch": user.batch,
            }
        })),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    let (user, token) = auth_service::login(&pool, &body.email, &body.password).await?;

    let mut response = Json(json!({
        "success": true,
        "message": "Login successful",
        "user": {
            "id": user.id,
            "name": user.name,
            "matric": user.matric,
            "email": user.email,
            "program": user.program,
        }
    }))
    .into_response();

    let cookie = session_cookie(USER_SESSION_COOKIE, token);
    response.headers_mut().append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| ApiError::Internal("invalid cookie header".to_string()))?,
    );
    Ok(response)
}

pub async fn logout_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<UserSession>,
) -> Result<Response, ApiError> {
    auth_service::logout(&pool, session.user_id).await?;

    let mut response = Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
    .into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        expired_session_cookie(USER_SESSION_COOKIE)
            .to_string()
            .parse()
            .map_err(|_| ApiError::Internal("invalid cookie header".to_string()))?,
    );
    Ok(response)
}

/// Public: reports whether the caller holds a valid session, never a 401.
pub async fn session_handler(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = session_token(&headers, USER_SESSION_COOKIE) else {
        return Ok(Json(json!({ "success": true, "authenticated": false })));
    };

    match auth_service::user_by_session(&pool, &token).await? {
        Some(user) => Ok(Json(json!({
            "success": true,
            "authenticated": true,
            "user_id": user.id,
            "user_name": user.name,
            "user_email": user.email,
        }))),
        None => Ok(Json(json!({ "success": true, "authenticated": false }))),
    }
}
