/// Message handlers - HTTP endpoints for message CRUD and paging
use crate::error::AppResult;
use crate::models::{CreateMessageRequest, ListMessagesQuery, UpdateMessageRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// POST /messages
pub async fn create_message(
    state: web::Data<AppState>,
    req: web::Json<CreateMessageRequest>,
) -> AppResult<HttpResponse> {
    let message = state.messages.create_message(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(message))
}

/// GET /messages
///
/// Without query parameters the whole table is returned as an array. With
/// `page_size` or `paging_state` the response is one page plus the token for
/// the next one.
pub async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<ListMessagesQuery>,
) -> AppResult<HttpResponse> {
    if !query.is_paged() {
        let messages = state.messages.list_messages().await?;
        return Ok(HttpResponse::Ok().json(messages));
    }

    let page = state
        .messages
        .list_messages_paged(query.page_size(), query.paging_state.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /messages/{id}
pub async fn get_message(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message = state.messages.get_message(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

/// PUT /messages/{id}
pub async fn update_message(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<UpdateMessageRequest>,
) -> AppResult<HttpResponse> {
    let message = state
        .messages
        .update_message(id.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(message))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.messages.delete_message(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json("Message deleted successfully"))
}
