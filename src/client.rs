use crate::error::Result;
use crate::models::{Image, ImageListResponse, Message, MessageListResponse, MAX_PAGE_LIMIT};

/// HTTP client for the content API
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Fetch a single page of images
    pub async fn fetch_image_page(&self, page: u32, limit: u32) -> Result<ImageListResponse> {
        let response = self
            .http
            .get(self.url("/images"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Fetch every image, following pagination at the largest page size
    pub async fn fetch_all_images(&self) -> Result<Vec<Image>> {
        let mut images = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_image_page(page, MAX_PAGE_LIMIT).await?;
            images.extend(batch.images);
            if u64::from(page) >= batch.pagination.pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} images in {} page(s)", images.len(), page);
        Ok(images)
    }

    pub async fn fetch_messages(&self) -> Result<Vec<Message>> {
        let response = self
            .http
            .get(self.url("/messages"))
            .send()
            .await?
            .error_for_status()?;

        let list: MessageListResponse = response.json().await?;
        Ok(list.messages)
    }
}
