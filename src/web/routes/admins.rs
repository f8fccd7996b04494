use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{admin_service, ApiError};
use crate::web::middleware::auth::AdminSession;

pub async fn list_admins_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Value>, ApiError> {
    let admins = admin_service::list(&pool, &session.role).await?;
    Ok(Json(json!({ "success": true, "admins": admins })))
}

#[derive(Deserialize)]
pub struct SaveAdminBody {
    admin_id: Option<i64>,
    name: String,
    email: String,
    role: String,
    password: Option<String>,
}

pub async fn save_admin_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<SaveAdminBody>,
) -> Result<Json<Value>, ApiError> {
    let updating = body.admin_id.is_some();
    let admin_id = admin_service::save(
        &pool,
        session.admin_id,
        &session.role,
        admin_service::SaveAdminInput {
            admin_id: body.admin_id,
            name: body.name,
            email: body.email,
            role: body.role,
            password: body.password.filter(|p| !p.is_empty()),
        },
    )
    .await?;

    let message = if updating {
        "Admin updated successfully"
    } else {
        "Admin created successfully"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "admin_id": admin_id,
    })))
}

pub async fn delete_admin_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Path(admin_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    admin_service::delete(&pool, session.admin_id, &session.role, admin_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Admin deleted successfully"
    })))
}
