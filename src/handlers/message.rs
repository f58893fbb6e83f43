use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::handlers::parse_id;
use crate::models::{
    CreateMessageRequest, MessageCreatedResponse, MessageDeleteResponse, MessageListResponse,
};
use crate::services::MessageService;
use crate::AppState;

/// List all messages
/// GET /api/messages
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<MessageListResponse>> {
    let response = MessageService::list_messages(state.store.as_ref()).await?;
    Ok(Json(response))
}

/// Add a message
/// POST /api/messages
pub async fn create_message(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageCreatedResponse>)> {
    let Json(req) = body?;
    let text = req.validate().map_err(AppError::Validation)?;
    let response = MessageService::create_message(state.store.as_ref(), &text).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete a message
/// DELETE /api/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageDeleteResponse>> {
    let id = parse_id(&id, "Invalid message ID")?;
    let response = MessageService::delete_message(state.store.as_ref(), id).await?;
    Ok(Json(response))
}
