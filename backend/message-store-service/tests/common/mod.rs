//! Shared fixtures for the HTTP integration tests.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use message_store_service::handlers;
use message_store_service::models::Message;
use message_store_service::repository::{
    InMemoryMessageRepository, MessagePage, MessageRepository, PagingCursor, StoreError,
};
use message_store_service::services::MessageService;
use message_store_service::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Builds the app the same way `main` does, minus CORS and request logging.
pub async fn setup_test_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .configure(handlers::configure_routes),
    )
    .await
}

pub fn state_with(repo: Arc<dyn MessageRepository>) -> web::Data<AppState> {
    web::Data::new(AppState::new(MessageService::new(repo)))
}

pub fn in_memory_state() -> web::Data<AppState> {
    state_with(Arc::new(InMemoryMessageRepository::new()))
}

pub fn failing_state(failure: Failure) -> web::Data<AppState> {
    state_with(Arc::new(FailingRepository::new(failure)))
}

pub fn create_body(body: &str) -> Value {
    json!({
        "body": body,
        "conversation_id": Uuid::now_v7(),
        "sender_id": Uuid::now_v7(),
    })
}

/// How every call to [`FailingRepository`] fails.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Storage,
    Timeout,
}

/// Store whose every call fails, for exercising the 5xx paths.
pub struct FailingRepository {
    failure: Failure,
}

impl FailingRepository {
    pub fn new(failure: Failure) -> Self {
        Self { failure }
    }

    fn error(&self) -> StoreError {
        match self.failure {
            Failure::Storage => StoreError::Storage("Cannot achieve consistency level QUORUM".into()),
            Failure::Timeout => StoreError::Timeout(Duration::from_secs(10)),
        }
    }
}

#[async_trait::async_trait]
impl MessageRepository for FailingRepository {
    async fn create(&self, _message: &Message) -> Result<Message, StoreError> {
        Err(self.error())
    }

    async fn get(&self, _id: Uuid) -> Result<Message, StoreError> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        Err(self.error())
    }

    async fn list_paged(
        &self,
        _page_size: Option<i32>,
        _cursor: Option<PagingCursor>,
    ) -> Result<MessagePage, StoreError> {
        Err(self.error())
    }

    async fn update(&self, _id: Uuid, _message: &Message) -> Result<Message, StoreError> {
        Err(self.error())
    }

    async fn delete(&self, _id: Uuid) -> Result<(), StoreError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(self.error())
    }
}
