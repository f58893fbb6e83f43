use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::FieldError;

/// Stored message
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: String,
}

/// Messages every fresh store starts with
pub const DEFAULT_MESSAGES: [&str; 10] = [
    "I love how your smile lights up my world! ❤️",
    "You make my heart hop with joy! 🐸",
    "Being with you is my favorite place to be 💕",
    "You're toad-ally amazing! I ribbit you! 🐸",
    "Every day with you feels like a sunny day! ☀️",
    "Your laugh is my favorite sound in the world 🎵",
    "You're my sunshine on cloudy days ☁️",
    "Just thinking about you makes me smile 😊",
    "You make ordinary moments extraordinary ✨",
    "I'm so lucky to have you in my life 🍀",
];

/// Create message request. `text` stays untyped so a wrong type is reported per field.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    pub text: Option<serde_json::Value>,
}

impl CreateMessageRequest {
    /// Returns the trimmed text
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let text = match &self.text {
            None | Some(serde_json::Value::Null) => {
                return Err(vec![FieldError::new("text", "Required")]);
            }
            Some(serde_json::Value::String(text)) => text.trim(),
            Some(_) => return Err(vec![FieldError::new("text", "Expected string")]),
        };

        if text.is_empty() {
            return Err(vec![FieldError::new("text", "Message text cannot be empty")]);
        }

        Ok(text.to_string())
    }
}

/// GET /api/messages response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub count: u64,
}

/// POST /api/messages response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageCreatedResponse {
    pub message: Message,
    pub count: u64,
}

/// DELETE /api/messages/:id response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDeleteResponse {
    pub message: String,
    pub count: u64,
}
