use crate::error::{AppError, Result};
use crate::models::{MessageCreatedResponse, MessageDeleteResponse, MessageListResponse};
use crate::store::ContentStore;

/// Message service
pub struct MessageService;

impl MessageService {
    pub async fn list_messages(store: &dyn ContentStore) -> Result<MessageListResponse> {
        let messages = store.list_messages().await?;
        let count = messages.len() as u64;
        Ok(MessageListResponse { messages, count })
    }

    /// Store an already validated, trimmed message
    pub async fn create_message(store: &dyn ContentStore, text: &str) -> Result<MessageCreatedResponse> {
        let message = store.add_message(text).await?;
        let count = store.count_messages().await?;
        tracing::info!("Added message {}", message.id);
        Ok(MessageCreatedResponse { message, count })
    }

    pub async fn delete_message(store: &dyn ContentStore, id: i64) -> Result<MessageDeleteResponse> {
        if !store.delete_message(id).await? {
            return Err(AppError::NotFound("Message not found".to_string()));
        }

        let count = store.count_messages().await?;
        tracing::info!("Deleted message {}", id);
        Ok(MessageDeleteResponse {
            message: "Message deleted successfully".to_string(),
            count,
        })
    }
}
