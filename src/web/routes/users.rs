use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{user_service, ApiError};

pub async fn stats_handler(State(pool): State<SqlitePool>) -> Result<Json<Value>, ApiError> {
    let stats = user_service::stats(&pool).await?;
    Ok(Json(json!({
        "success": true,
        "pending_count": stats.pending_count,
        "total_users": stats.total_users,
    })))
}

pub async fn pending_users_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let users = user_service::list_pending(&pool).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

#[derive(Deserialize)]
pub struct ApprovalBody {
    user_id: i64,
    #[serde(default)]
    comment: Option<String>,
}

pub async fn approve_user_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<ApprovalBody>,
) -> Result<Json<Value>, ApiError> {
    user_service::approve(&pool, body.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User approved successfully"
    })))
}

pub async fn reject_user_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<ApprovalBody>,
) -> Result<Json<Value>, ApiError> {
    let rejected = user_service::reject(&pool, body.user_id).await?;
    tracing::info!(
        user_id = body.user_id,
        reason = body.comment.as_deref().unwrap_or(""),
        "user rejected"
    );
    Ok(Json(json!({
        "success": true,
        "message": "User rejected and removed successfully",
        "user": { "name": rejected.name, "email": rejected.email, "matric": rejected.matric }
    })))
}

pub async fn list_users_handler(State(pool): State<SqlitePool>) -> Result<Json<Value>, ApiError> {
    let users = user_service::list_verified(&pool).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

pub async fn get_user_handler(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let user = user_service::get(&pool, user_id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

#[derive(Deserialize)]
pub struct AddUserBody {
    name: String,
    matric: String,
    email: String,
    password: String,
    program: String,
    #[serde(default = "default_verified")]
    is_verified: bool,
}

fn default_verified() -> bool {
    true
}

pub async fn add_user_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<AddUserBody>,
) -> Result<Response, ApiError> {
    let user_id = user_service::add(
        &pool,
        user_service::AddUserInput {
            name: body.name,
            matric: body.matric,
            email: body.email,
            password: body.password,
            program: body.program,
            is_verified: body.is_verified,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User created successfully",
            "user_id": user_id,
        })),
    )
        .into_response())
}

#[derive(Deserialize, Default)]
pub struct UpdateUserBody {
    name: Option<String>,
    matric: Option<String>,
    email: Option<String>,
    program: Option<String>,
    year: Option<String>,
    batch: Option<String>,
    phone: Option<String>,
    email_alt: Option<String>,
    bio: Option<String>,
    description: Option<String>,
    instagram: Option<String>,
    facebook: Option<String>,
    twitter: Option<String>,
    linkedin: Option<String>,
    tiktok: Option<String>,
    password: Option<String>,
}

pub async fn update_user_handler(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<Value>, ApiError> {
    user_service::update(
        &pool,
        user_id,
        user_service::UpdateUserInput {
            name: body.name,
            matric: body.matric,
            email: body.email,
            program: body.program,
            year: body.year,
            batch: body.batch,
            phone: body.phone,
            email_alt: body.email_alt,
            bio: body.bio,
            description: body.description,
            instagram: body.instagram,
            facebook: body.facebook,
            twitter: body.twitter,
            linkedin: body.linkedin,
            tiktok: body.tiktok,
            password: body.password,
        },
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully"
    })))
}

pub async fn delete_user_handler(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    user_service::delete(&pool, user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
