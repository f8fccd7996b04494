use sqlx::SqlitePool;

use crate::database::{contact_request_repo, conversation_repo, message_repo, user_repo};
use crate::models::conversations::STATUS_PENDING;
use crate::models::messages::{SENDER_ADMIN, SENDER_USER};
use crate::models::{ConversationRow, MessageRow, PendingConversationRow};
use crate::services::ApiError;

/// Pending conversations for the admin inbox, newest activity first.
pub async fn list_pending_conversations(
    pool: &SqlitePool,
) -> Result<Vec<PendingConversationRow>, ApiError> {
    Ok(conversation_repo::list_pending_with_user(pool).await?)
}

/// Assigns the conversation to the admin and activates it. The claim is a
/// single conditional UPDATE, so two admins racing the same conversation
/// cannot both win: the loser sees zero affected rows.
pub async fn accept_pending_conversation(
    pool: &SqlitePool,
    admin_id: i64,
    conversation_id: i64,
) -> Result<(), ApiError> {
    let conversation = conversation_repo::get(pool, conversation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    if conversation.status != STATUS_PENDING {
        return Err(ApiError::BadRequest(
            "Conversation is not pending".to_string(),
        ));
    }
    if conversation.admin_id.is_some() {
        return Err(ApiError::BadRequest(
            "Conversation already accepted by another admin".to_string(),
        ));
    }

    let claimed = conversation_repo::claim(pool, conversation_id, admin_id).await?;
    if claimed == 0 {
        // Lost the race between the read above and the UPDATE.
        return Err(ApiError::BadRequest(
            "Conversation already accepted by another admin".to_string(),
        ));
    }

    tracing::info!(conversation_id, admin_id, "conversation claimed");
    Ok(())
}

#[derive(Debug)]
pub struct PromotionOutcome {
    pub conversation_id: i64,
    pub user_id: i64,
    pub already_exists: bool,
}

/// Promotes a contact request into an active conversation owned by the
/// calling admin, seeded with the original request text as the first user
/// message. Conversation insert, seed message and request resolution commit
/// atomically; a failure in any of the three leaves no partial state.
pub async fn promote_contact_request(
    pool: &SqlitePool,
    admin_id: i64,
    request_id: i64,
) -> Result<PromotionOutcome, ApiError> {
    let request = contact_request_repo::get(pool, request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let user_id = user_repo::find_verified_id_by_matric(pool, &request.matric)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(
                "User not found. User must be registered and verified to start conversation."
                    .to_string(),
            )
        })?;

    if let Some(existing) = conversation_repo::find_active_between(pool, user_id, admin_id).await?
    {
        return Ok(PromotionOutcome {
            conversation_id: existing,
            user_id,
            already_exists: true,
        });
    }

    let mut tx = pool.begin().await?;
    let conversation_id = conversation_repo::insert_active(&mut *tx, user_id, admin_id).await?;
    message_repo::insert_in_tx(&mut *tx, conversation_id, user_id, SENDER_USER, &request.message)
        .await?;
    contact_request_repo::mark_resolved(&mut *tx, request_id).await?;
    tx.commit().await?;

    tracing::info!(request_id, conversation_id, admin_id, "contact request promoted");

    Ok(PromotionOutcome {
        conversation_id,
        user_id,
        already_exists: false,
    })
}

async fn admin_conversation_access(
    pool: &SqlitePool,
    admin_id: i64,
    conversation_id: i64,
) -> Result<ConversationRow, ApiError> {
    let conversation = conversation_repo::get(pool, conversation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    match conversation.admin_id {
        Some(owner) if owner != admin_id => {
            Err(ApiError::Forbidden("Access denied".to_string()))
        }
        _ => Ok(conversation),
    }
}

/// Appends an admin message. A still-unclaimed pending conversation is
/// claimed on the way in (first admin reply doubles as accept).
pub async fn send_admin_message(
    pool: &SqlitePool,
    admin_id: i64,
    conversation_id: i64,
    text: &str,
) -> Result<i64, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let conversation = admin_conversation_access(pool, admin_id, conversation_id).await?;

    if conversation.status == STATUS_PENDING && conversation.admin_id.is_none() {
        let claimed = conversation_repo::claim(pool, conversation_id, admin_id).await?;
        if claimed == 0 {
            // Re-check ownership: another admin claimed it first.
            admin_conversation_access(pool, admin_id, conversation_id).await?;
        }
    }

    let message_id =
        message_repo::insert(pool, conversation_id, admin_id, SENDER_ADMIN, text).await?;
    conversation_repo::touch_last_message(pool, conversation_id).await?;
    Ok(message_id)
}

/// Full thread, oldest first. Reading as the admin marks every unread user
/// message read — a read with a side effect, by contract.
pub async fn list_admin_messages(
    pool: &SqlitePool,
    admin_id: i64,
    conversation_id: i64,
) -> Result<Vec<MessageRow>, ApiError> {
    admin_conversation_access(pool, admin_id, conversation_id).await?;

    let messages = message_repo::list(pool, conversation_id).await?;
    message_repo::mark_read(pool, conversation_id, SENDER_USER).await?;
    Ok(messages)
}

/// Student side: first message opens a pending, unclaimed conversation;
/// later messages append to the existing open one.
pub async fn send_user_message(
    pool: &SqlitePool,
    user_id: i64,
    text: &str,
) -> Result<(i64, i64), ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let conversation_id = match conversation_repo::find_open_for_user(pool, user_id).await? {
        Some(conversation) => conversation.id,
        None => conversation_repo::insert_pending(pool, user_id).await?,
    };

    let message_id =
        message_repo::insert(pool, conversation_id, user_id, SENDER_USER, text).await?;
    conversation_repo::touch_last_message(pool, conversation_id).await?;
    Ok((conversation_id, message_id))
}

pub async fn list_user_messages(
    pool: &SqlitePool,
    user_id: i64,
    conversation_id: i64,
) -> Result<Vec<MessageRow>, ApiError> {
    let conversation = conversation_repo::get(pool, conversation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;
    if conversation.user_id != user_id {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let messages = message_repo::list(pool, conversation_id).await?;
    message_repo::mark_read(pool, conversation_id, SENDER_ADMIN).await?;
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{contact_request_repo, conversation_repo, message_repo};
    use crate::models::conversations::STATUS_ACTIVE;
    use crate::services::contact_service;
    use crate::test_util::{seed_admin, seed_user, test_pool};

    #[tokio::test]
    async fn promotion_with_unknown_matric_leaves_request_pending() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "moderator").await;
        let request_id = contact_request_repo::insert(
            &pool,
            "Ghost",
            "B039900001",
            None,
            "Nobody registered this matric",
        )
        .await
        .unwrap();

        let err = promote_contact_request(&pool, admin, request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let request = contact_request_repo::get(&pool, request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, "Pending");
        assert!(request.resolved_at.is_none());
    }

    #[tokio::test]
    async fn promotion_with_unverified_user_fails() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "moderator").await;
        seed_user(&pool, "B032510020", false).await;
        let request_id =
            contact_request_repo::insert(&pool, "Unverified", "B032510020", None, "Help")
                .await
                .unwrap();

        let err = promote_contact_request(&pool, admin, request_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn promotion_is_idempotent_per_admin() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;
        let request_id =
            contact_request_repo::insert(&pool, "Aina", "B032510017", None, "Need help")
                .await
                .unwrap();

        let first = promote_contact_request(&pool, admin, request_id)
            .await
            .unwrap();
        assert!(!first.already_exists);
        assert_eq!(first.user_id, user);

        // Seeded with exactly one message carrying the request text.
        let messages = message_repo::list(&pool, first.conversation_id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Need help");
        assert_eq!(messages[0].sender_type, "user");

        let request = contact_request_repo::get(&pool, request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, "Resolved");

        let second = promote_contact_request(&pool, admin, request_id)
            .await
            .unwrap();
        assert!(second.already_exists);
        assert_eq!(second.conversation_id, first.conversation_id);

        // No second conversation or seed message appeared.
        let count = message_repo::count_for_conversation(&pool, first.conversation_id)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn accept_rejects_claimed_and_non_pending_conversations() {
        let pool = test_pool().await;
        let admin_a = seed_admin(&pool, "moderator").await;
        let admin_b = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;

        let conversation_id = conversation_repo::insert_pending(&pool, user).await.unwrap();
        accept_pending_conversation(&pool, admin_a, conversation_id)
            .await
            .unwrap();

        // Claimed by A: B fails, and so does A trying again.
        for admin in [admin_b, admin_a] {
            let err = accept_pending_conversation(&pool, admin, conversation_id)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)));
        }

        let err = accept_pending_conversation(&pool, admin_a, 9999)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_reply_claims_pending_conversation() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;
        let conversation_id = conversation_repo::insert_pending(&pool, user).await.unwrap();

        let before = message_repo::count_for_conversation(&pool, conversation_id)
            .await
            .unwrap();
        send_admin_message(&pool, admin, conversation_id, "On it")
            .await
            .unwrap();

        let conversation = conversation_repo::get(&pool, conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conversation.admin_id, Some(admin));
        assert_eq!(conversation.status, STATUS_ACTIVE);

        let after = message_repo::count_for_conversation(&pool, conversation_id)
            .await
            .unwrap();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn send_message_enforces_ownership_and_input() {
        let pool = test_pool().await;
        let admin_a = seed_admin(&pool, "moderator").await;
        let admin_b = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;
        let conversation_id = conversation_repo::insert_pending(&pool, user).await.unwrap();

        send_admin_message(&pool, admin_a, conversation_id, "hello")
            .await
            .unwrap();

        let err = send_admin_message(&pool, admin_b, conversation_id, "mine now")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = send_admin_message(&pool, admin_a, conversation_id, "   \n ")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn listing_marks_user_messages_read_once() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;

        let (conversation_id, _) = send_user_message(&pool, user, "first").await.unwrap();
        send_user_message(&pool, user, "second").await.unwrap();

        let messages = list_admin_messages(&pool, admin, conversation_id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 2);
        // The listing itself still saw the pre-side-effect rows.
        assert!(messages.iter().all(|m| !m.is_read));

        // Side effect applied once; second pass changes nothing.
        let marked = message_repo::mark_read(&pool, conversation_id, "user")
            .await
            .unwrap();
        assert_eq!(marked, 0);

        let messages = list_admin_messages(&pool, admin, conversation_id)
            .await
            .unwrap();
        assert!(messages.iter().all(|m| m.is_read));
    }

    #[tokio::test]
    async fn user_messages_reuse_open_conversation() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "B032510017", true).await;

        let (first_conv, _) = send_user_message(&pool, user, "hello?").await.unwrap();
        let (second_conv, _) = send_user_message(&pool, user, "anyone?").await.unwrap();
        assert_eq!(first_conv, second_conv);

        let conversation = conversation_repo::get(&pool, first_conv)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conversation.status, "pending");
        assert!(conversation.admin_id.is_none());

        let other = seed_user(&pool, "B032510018", true).await;
        let err = list_user_messages(&pool, other, first_conv).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    // End-to-end: contact request -> promotion by admin A -> accept by admin B fails.
    #[tokio::test]
    async fn contact_request_to_conversation_flow() {
        let pool = test_pool().await;
        let admin_a = seed_admin(&pool, "moderator").await;
        let admin_b = seed_admin(&pool, "moderator").await;
        let user = seed_user(&pool, "B032510017", true).await;

        let request_id = contact_service::submit(&pool, user, "Need help", Some(""))
            .await
            .unwrap();
        let request = contact_request_repo::get(&pool, request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, "Pending");
        assert_eq!(request.phone, None);

        let outcome = promote_contact_request(&pool, admin_a, request_id)
            .await
            .unwrap();
        assert!(!outcome.already_exists);

        let request = contact_request_repo::get(&pool, request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, "Resolved");

        let err = accept_pending_conversation(&pool, admin_b, outcome.conversation_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
