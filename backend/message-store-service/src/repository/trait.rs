use super::{MessagePage, PagingCursor, StoreError};
use crate::models::Message;
use uuid::Uuid;

/// Storage operations on the messages table.
///
/// Implementations are shared across request handlers, so they must be safe
/// to call concurrently.
#[async_trait::async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a fully formed message. An existing row with the same key is
    /// overwritten.
    async fn create(&self, message: &Message) -> Result<Message, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Message, StoreError>;

    /// Every message in the table, in the store's natural order.
    async fn list(&self) -> Result<Vec<Message>, StoreError>;

    /// One page of at most `page_size` messages, resuming from `cursor`.
    ///
    /// A missing or non-positive page size means [`super::DEFAULT_PAGE_SIZE`].
    async fn list_paged(
        &self,
        page_size: Option<i32>,
        cursor: Option<PagingCursor>,
    ) -> Result<MessagePage, StoreError>;

    /// Replace the mutable fields of message `id`. The stored `created_at` is
    /// kept. Fails with [`StoreError::NotFound`] if there is no such message.
    async fn update(&self, id: Uuid, message: &Message) -> Result<Message, StoreError>;

    /// Remove message `id`. Deleting a message that does not exist succeeds.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Health check
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
