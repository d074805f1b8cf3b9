/// Message service - validation and server-assigned fields in front of the store
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMessageRequest, Message, PagedMessagesResponse, UpdateMessageRequest,
};
use crate::repository::{encode_token, MessageRepository, PagingCursor};
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
}

/// Current time at the precision the store keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn require_id(field: &str, id: Option<Uuid>) -> AppResult<Uuid> {
    match id {
        Some(id) if !id.is_nil() => Ok(id),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    /// Store a new message with a fresh time-ordered id.
    pub async fn create_message(&self, req: CreateMessageRequest) -> AppResult<Message> {
        req.validate()?;
        let conversation_id = require_id("conversation_id", req.conversation_id)?;
        let sender_id = require_id("sender_id", req.sender_id)?;

        let message = Message {
            id: Uuid::now_v7(),
            conversation_id,
            sender_id,
            created_at: now(),
            updated_at: None,
            body: req.body,
            is_soft_deleted: false,
        };
        let message = self.repo.create(&message).await?;

        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            "Message created"
        );
        Ok(message)
    }

    pub async fn get_message(&self, id: Uuid) -> AppResult<Message> {
        Ok(self.repo.get(id).await?)
    }

    pub async fn list_messages(&self) -> AppResult<Vec<Message>> {
        Ok(self.repo.list().await?)
    }

    /// One page of messages. An absent or empty `paging_state` starts from
    /// the beginning.
    pub async fn list_messages_paged(
        &self,
        page_size: Option<i32>,
        paging_state: Option<&str>,
    ) -> AppResult<PagedMessagesResponse> {
        let cursor = match paging_state {
            Some(token) => PagingCursor::decode(token)?,
            None => None,
        };

        let page = self.repo.list_paged(page_size, cursor).await?;
        Ok(PagedMessagesResponse {
            next_page_token: encode_token(page.next_cursor.as_ref()),
            messages: page.messages,
        })
    }

    pub async fn update_message(&self, id: Uuid, req: UpdateMessageRequest) -> AppResult<Message> {
        req.validate()?;
        let conversation_id = require_id("conversation_id", req.conversation_id)?;
        let sender_id = require_id("sender_id", req.sender_id)?;

        let now = now();
        let replacement = Message {
            id,
            conversation_id,
            sender_id,
            // the store keeps the original creation time
            created_at: now,
            updated_at: Some(now),
            body: req.body,
            is_soft_deleted: req.is_soft_deleted,
        };
        let updated = self.repo.update(id, &replacement).await?;

        info!(message_id = %id, "Message updated");
        Ok(updated)
    }

    pub async fn delete_message(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(message_id = %id, "Message deleted");
        Ok(())
    }

    /// Whether the backing store answers.
    pub async fn ready(&self) -> AppResult<()> {
        Ok(self.repo.health_check().await?)
    }
}
