use crate::services::MessageService;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<MessageService>,
}

impl AppState {
    pub fn new(messages: MessageService) -> Self {
        Self {
            messages: Arc::new(messages),
        }
    }
}
