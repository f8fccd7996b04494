use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::services::{conversation_service, ApiError};
use crate::web::middleware::auth::{AdminSession, UserSession};

pub async fn message_requests_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Value>, ApiError> {
    let conversations = conversation_service::list_pending_conversations(&pool).await?;
    let count = conversations.len();
    Ok(Json(json!({
        "success": true,
        "conversations": conversations,
        "count": count,
    })))
}

#[derive(Deserialize)]
pub struct AcceptRequestBody {
    conversation_id: i64,
}

pub async fn accept_request_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<AcceptRequestBody>,
) -> Result<Json<Value>, ApiError> {
    conversation_service::accept_pending_conversation(&pool, session.admin_id, body.conversation_id)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Conversation accepted successfully",
        "conversation_id": body.conversation_id,
    })))
}

#[derive(Deserialize)]
pub struct StartFromRequestBody {
    request_id: i64,
}

pub async fn start_from_request_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<StartFromRequestBody>,
) -> Result<Json<Value>, ApiError> {
    let outcome =
        conversation_service::promote_contact_request(&pool, session.admin_id, body.request_id)
            .await?;

    if outcome.already_exists {
        return Ok(Json(json!({
            "success": true,
            "message": "Conversation already exists",
            "conversation_id": outcome.conversation_id,
            "already_exists": true,
        })));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Conversation started successfully",
        "conversation_id": outcome.conversation_id,
        "user_id": outcome.user_id,
    })))
}

#[derive(Deserialize)]
pub struct SendMessageBody {
    conversation_id: i64,
    message: String,
}

pub async fn send_message_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<Value>, ApiError> {
    let message_id = conversation_service::send_admin_message(
        &pool,
        session.admin_id,
        body.conversation_id,
        &body.message,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully",
        "message_id": message_id,
        "conversation_id": body.conversation_id,
    })))
}

pub async fn list_messages_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<AdminSession>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let messages =
        conversation_service::list_admin_messages(&pool, session.admin_id, conversation_id)
            .await?;
    let count = messages.len();
    Ok(Json(json!({
        "success": true,
        "messages": messages,
        "count": count,
    })))
}

#[derive(Deserialize)]
pub struct UserSendMessageBody {
    message: String,
}

pub async fn user_send_message_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<UserSession>,
    Json(body): Json<UserSendMessageBody>,
) -> Result<Json<Value>, ApiError> {
    let (conversation_id, message_id) =
        conversation_service::send_user_message(&pool, session.user_id, &body.message).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully",
        "message_id": message_id,
        "conversation_id": conversation_id,
    })))
}

pub async fn user_list_messages_handler(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<UserSession>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let messages =
        conversation_service::list_user_messages(&pool, session.user_id, conversation_id).await?;
    let count = messages.len();
    Ok(Json(json!({
        "success": true,
        "messages": messages,
        "count": count,
    })))
}
