use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{user_service, ApiError};

pub async fn members_handler(State(pool): State<SqlitePool>) -> Result<Json<Value>, ApiError> {
    let members = user_service::list_members(&pool).await?;
    Ok(Json(json!({ "success": true, "members": members })))
}

pub async fn alumni_handler(State(pool): State<SqlitePool>) -> Result<Json<Value>, ApiError> {
    let alumni = user_service::list_alumni(&pool).await?;
    Ok(Json(json!({ "success": true, "alumni": alumni })))
}

/// Profile of another (verified) user, for the logged-in member directory.
pub async fn profile_handler(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let user = user_service::get_profile(&pool, user_id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}
