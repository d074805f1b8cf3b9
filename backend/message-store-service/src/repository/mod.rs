//! Message storage.
//!
//! [`MessageRepository`] is the seam between the HTTP layer and the wide-column
//! store. [`ScyllaMessageRepository`] talks to the cluster;
//! [`InMemoryMessageRepository`] keeps everything in process and backs the
//! tests and the `memory` backend.

mod cursor;
mod error;
pub mod in_memory_repository;
pub mod scylla_repository;
mod r#trait;

pub use cursor::{encode_token, CursorError, PagingCursor};
pub use error::StoreError;
pub use in_memory_repository::InMemoryMessageRepository;
pub use r#trait::MessageRepository;
pub use scylla_repository::ScyllaMessageRepository;

use crate::models::Message;

/// Page size used when the caller gives none, or a non-positive one.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

pub fn effective_page_size(page_size: Option<i32>) -> i32 {
    match page_size {
        Some(size) if size > 0 => size,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// One page of a paged scan.
#[derive(Debug, Clone)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// `None` once the scan is exhausted
    pub next_cursor: Option<PagingCursor>,
}
