use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A stored chat message, one row of `messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub body: String,
    pub is_soft_deleted: bool,
}

/// POST /messages
///
/// Ids are optional at the serde level so that a missing id is reported as a
/// validation error instead of a JSON decoding error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "message body cannot be empty"))]
    pub body: String,
    pub conversation_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
}

/// PUT /messages/{id}: replaces every mutable field.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "message body cannot be empty"))]
    pub body: String,
    pub conversation_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
    #[serde(default)]
    pub is_soft_deleted: bool,
}

/// Query string of GET /messages.
///
/// `page_size` stays a string: anything that is not a positive integer falls
/// back to the default page size rather than failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub page_size: Option<String>,
    pub paging_state: Option<String>,
}

impl ListMessagesQuery {
    /// Either parameter switches GET /messages to the paged response shape.
    pub fn is_paged(&self) -> bool {
        self.page_size.is_some() || self.paging_state.is_some()
    }

    pub fn page_size(&self) -> Option<i32> {
        self.page_size.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PagedMessagesResponse {
    pub messages: Vec<Message>,
    /// Empty when there are no further pages
    pub next_page_token: String,
}
