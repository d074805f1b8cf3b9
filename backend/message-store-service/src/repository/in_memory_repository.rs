use super::{effective_page_size, MessagePage, MessageRepository, PagingCursor, StoreError};
use crate::models::Message;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;
use uuid::Uuid;

const TAG_LEN: usize = 8;

/// Process-local store ordered by message id.
///
/// Its paging cursor is the 16-byte id of the last message on the previous
/// page followed by a random tag drawn when the store is created, so a scan
/// survives concurrent inserts and deletes the same way a token scan does:
/// nothing is returned twice, and rows written behind the cursor are skipped.
/// Cursors without this store's tag are rejected.
#[derive(Debug)]
pub struct InMemoryMessageRepository {
    messages: RwLock<BTreeMap<Uuid, Message>>,
    cursor_tag: [u8; TAG_LEN],
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: RwLock::default(),
            cursor_tag: rand::random(),
        }
    }

    fn cursor_for(&self, id: Uuid) -> Option<PagingCursor> {
        let mut bytes = Vec::with_capacity(16 + TAG_LEN);
        bytes.extend_from_slice(id.as_bytes());
        bytes.extend_from_slice(&self.cursor_tag);
        PagingCursor::from_bytes(bytes)
    }

    /// The anchor id may have been deleted since; only the tag is checked.
    fn cursor_to_id(&self, cursor: &PagingCursor) -> Result<Uuid, StoreError> {
        let bytes = cursor.as_bytes();
        let rejected =
            || StoreError::InvalidCursor("paging state does not belong to this store".into());

        if bytes.len() != 16 + TAG_LEN || bytes[16..] != self.cursor_tag {
            return Err(rejected());
        }
        Uuid::from_slice(&bytes[..16]).map_err(|_| rejected())
    }
}

#[async_trait::async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, StoreError> {
        self.messages
            .write()
            .await
            .insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Message, StoreError> {
        self.messages
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        Ok(self.messages.read().await.values().cloned().collect())
    }

    async fn list_paged(
        &self,
        page_size: Option<i32>,
        cursor: Option<PagingCursor>,
    ) -> Result<MessagePage, StoreError> {
        let page_size = effective_page_size(page_size) as usize;
        let lower = match cursor {
            Some(ref c) => Bound::Excluded(self.cursor_to_id(c)?),
            None => Bound::Unbounded,
        };

        let messages = self.messages.read().await;
        let mut range = messages.range((lower, Bound::Unbounded));
        let page: Vec<Message> = range.by_ref().take(page_size).map(|(_, m)| m.clone()).collect();

        let next_cursor = match (range.next(), page.last()) {
            (Some(_), Some(last)) => self.cursor_for(last.id),
            _ => None,
        };

        Ok(MessagePage {
            messages: page,
            next_cursor,
        })
    }

    async fn update(&self, id: Uuid, message: &Message) -> Result<Message, StoreError> {
        let mut messages = self.messages.write().await;
        let existing = messages.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let updated = Message {
            id,
            created_at: existing.created_at,
            ..message.clone()
        };
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.messages.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::HashSet;

    fn message(body: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            conversation_id: Uuid::now_v7(),
            sender_id: Uuid::now_v7(),
            created_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
            updated_at: None,
            body: body.to_string(),
            is_soft_deleted: false,
        }
    }

    async fn seeded(n: usize) -> InMemoryMessageRepository {
        let repo = InMemoryMessageRepository::new();
        for i in 0..n {
            repo.create(&message(&format!("message {i}"))).await.unwrap();
        }
        repo
    }

    async fn scan(repo: &InMemoryMessageRepository, page_size: i32) -> Vec<Uuid> {
        let mut ids = Vec::new();
        let mut cursor = None;
        loop {
            let page = repo.list_paged(Some(page_size), cursor).await.unwrap();
            assert!(page.messages.len() <= page_size as usize);
            ids.extend(page.messages.iter().map(|m| m.id));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        ids
    }

    #[tokio::test]
    async fn test_get_missing_message() {
        let repo = InMemoryMessageRepository::new();
        let id = Uuid::now_v7();

        assert!(matches!(repo.get(id).await, Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_paged_scan_visits_every_message_once() {
        let repo = seeded(23).await;
        let all: HashSet<Uuid> = repo.list().await.unwrap().into_iter().map(|m| m.id).collect();

        for page_size in [1, 10, 24] {
            let ids = scan(&repo, page_size).await;
            let unique: HashSet<Uuid> = ids.iter().copied().collect();

            assert_eq!(ids.len(), 23, "page_size {page_size}");
            assert_eq!(unique, all, "page_size {page_size}");
        }
    }

    #[tokio::test]
    async fn test_default_page_size_applies() {
        let repo = seeded(15).await;

        let page = repo.list_paged(None, None).await.unwrap();
        assert_eq!(page.messages.len(), 10);
        assert!(page.next_cursor.is_some());

        let page = repo.list_paged(Some(0), None).await.unwrap();
        assert_eq!(page.messages.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_cursor() {
        let repo = InMemoryMessageRepository::new();
        let page = repo.list_paged(Some(5), None).await.unwrap();

        assert!(page.messages.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_foreign_cursor_is_rejected() {
        let repo = seeded(3).await;

        for bytes in [vec![1u8, 2, 3], vec![0u8; 16], vec![0u8; 24]] {
            let result = repo.list_paged(Some(2), PagingCursor::from_bytes(bytes)).await;
            assert!(matches!(result, Err(StoreError::InvalidCursor(_))));
        }
    }

    #[tokio::test]
    async fn test_cursor_from_another_store_is_rejected() {
        let repo = seeded(5).await;
        let other = seeded(5).await;

        let cursor = other.list_paged(Some(2), None).await.unwrap().next_cursor;
        assert!(cursor.is_some());

        let result = repo.list_paged(Some(2), cursor).await;
        assert!(matches!(result, Err(StoreError::InvalidCursor(_))));
    }

    #[tokio::test]
    async fn test_scan_resumes_after_anchor_is_deleted() {
        let repo = seeded(6).await;

        let first = repo.list_paged(Some(2), None).await.unwrap();
        repo.delete(first.messages[1].id).await.unwrap();

        let second = repo.list_paged(Some(2), first.next_cursor).await.unwrap();
        assert_eq!(second.messages.len(), 2);
        assert!(second.messages.iter().all(|m| m.id > first.messages[1].id));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = InMemoryMessageRepository::new();
        let original = message("before");
        repo.create(&original).await.unwrap();

        let mut replacement = message("after");
        replacement.created_at = Utc::now();
        replacement.updated_at = Some(Utc::now());
        let updated = repo.update(original.id, &replacement).await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.body, "after");
        assert_eq!(updated.conversation_id, replacement.conversation_id);
        assert_eq!(repo.get(original.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_message() {
        let repo = InMemoryMessageRepository::new();
        let result = repo.update(Uuid::now_v7(), &message("x")).await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = seeded(1).await;
        let id = repo.list().await.unwrap()[0].id;

        repo.delete(id).await.unwrap();
        repo.delete(id).await.unwrap();

        assert!(matches!(repo.get(id).await, Err(StoreError::NotFound(_))));
        assert!(repo.list().await.unwrap().is_empty());
    }
}
