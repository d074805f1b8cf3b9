/// Business logic services
pub mod message_service;

pub use message_service::MessageService;
