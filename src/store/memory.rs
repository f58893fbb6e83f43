use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{Image, Message, PageRequest, DEFAULT_MESSAGES};
use crate::store::ContentStore;

struct Collections {
    images: BTreeMap<i64, Image>,
    messages: BTreeMap<i64, Message>,
    next_image_id: i64,
    next_message_id: i64,
}

impl Collections {
    fn new() -> Self {
        Self {
            images: BTreeMap::new(),
            messages: BTreeMap::new(),
            next_image_id: 1,
            next_message_id: 1,
        }
    }

    fn push_image(&mut self, filename: &str, data: &str) -> Image {
        let id = self.next_image_id;
        self.next_image_id += 1;
        let image = Image {
            id,
            filename: filename.to_string(),
            data: data.to_string(),
        };
        self.images.insert(id, image.clone());
        image
    }

    fn push_message(&mut self, text: &str) -> Message {
        let id = self.next_message_id;
        self.next_message_id += 1;
        let message = Message {
            id,
            text: text.to_string(),
        };
        self.messages.insert(id, message.clone());
        message
    }
}

/// Ephemeral map-backed store for development and tests
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Store seeded with the default messages
    pub fn new() -> Self {
        let mut collections = Collections::new();
        for text in DEFAULT_MESSAGES {
            collections.push_message(text);
        }
        Self {
            inner: RwLock::new(collections),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_images(&self, page: PageRequest) -> Result<(Vec<Image>, u64)> {
        let inner = self.inner.read().await;
        let items = inner
            .images
            .values()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((items, inner.images.len() as u64))
    }

    async fn count_images(&self) -> Result<u64> {
        Ok(self.inner.read().await.images.len() as u64)
    }

    async fn add_image(&self, filename: &str, data: &str, max_files: u64) -> Result<Option<Image>> {
        // Write lock held across the check and the insert
        let mut inner = self.inner.write().await;
        if inner.images.len() as u64 >= max_files {
            return Ok(None);
        }

        Ok(Some(inner.push_image(filename, data)))
    }

    async fn delete_image(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.images.remove(&id).is_some())
    }

    async fn image_data_bytes(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.images.values().map(|i| i.data.len() as u64).sum())
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        Ok(self.inner.read().await.messages.values().cloned().collect())
    }

    async fn count_messages(&self) -> Result<u64> {
        Ok(self.inner.read().await.messages.len() as u64)
    }

    async fn add_message(&self, text: &str) -> Result<Message> {
        Ok(self.inner.write().await.push_message(text))
    }

    async fn delete_message(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.messages.remove(&id).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
