use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{contact_service, ApiError};
use crate::web::middleware::auth::UserSession;

#[derive(Deserialize)]
pub struct ContactAdminBody {
    message: String,
    #[serde(default)]
    phone: Option<String>,
}

pub async fn contact_admin_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<UserSession>,
    Json(body): Json<ContactAdminBody>,
) -> Result<Response, ApiError> {
    let request_id =
        contact_service::submit(&pool, session.user_id, &body.message, body.phone.as_deref())
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Your request has been submitted successfully. Admin will contact you shortly.",
            "request_id": request_id,
        })),
    )
        .into_response())
}

pub async fn list_requests_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let requests = contact_service::list(&pool).await?;
    let count = requests.len();
    Ok(Json(json!({
        "success": true,
        "requests": requests,
        "count": count,
    })))
}

#[derive(Deserialize)]
pub struct ResolveRequestBody {
    request_id: i64,
}

pub async fn resolve_request_handler(
    State(pool): State<SqlitePool>,
    Json(body): Json<ResolveRequestBody>,
) -> Result<Json<Value>, ApiError> {
    contact_service::resolve(&pool, body.request_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Request marked as resolved",
        "request_id": body.request_id,
    })))
}

pub async fn delete_request_handler(
    State(pool): State<SqlitePool>,
    Path(request_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    contact_service::delete(&pool, request_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Request deleted successfully"
    })))
}
