pub mod message;

pub use message::{
    CreateMessageRequest, ListMessagesQuery, Message, PagedMessagesResponse, UpdateMessageRequest,
};
