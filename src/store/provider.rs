use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Image, Message, PageRequest};

/// Content store trait, implemented by every persistence backend
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// One page of images in id order, plus the collection size.
    /// A page past the end yields an empty slice.
    async fn list_images(&self, page: PageRequest) -> Result<(Vec<Image>, u64)>;

    /// Number of stored images
    async fn count_images(&self) -> Result<u64>;

    /// Insert an image unless the collection already holds `max_files` images.
    /// The count check and the insert are atomic; `None` means the collection is full.
    async fn add_image(&self, filename: &str, data: &str, max_files: u64) -> Result<Option<Image>>;

    /// Delete an image. Returns `true` if a row was removed.
    async fn delete_image(&self, id: i64) -> Result<bool>;

    /// Total length of the stored base64 image text
    async fn image_data_bytes(&self) -> Result<u64>;

    /// All messages
    async fn list_messages(&self) -> Result<Vec<Message>>;

    /// Number of stored messages
    async fn count_messages(&self) -> Result<u64>;

    /// Insert a message
    async fn add_message(&self, text: &str) -> Result<Message>;

    /// Delete a message. Returns `true` if a row was removed.
    async fn delete_message(&self, id: i64) -> Result<bool>;

    /// Backend name reported in statistics
    fn backend_name(&self) -> &'static str;
}
