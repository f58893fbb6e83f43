use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{AppError, Result};
use crate::models::{
    ImageDeleteResponse, ImageListResponse, ImageUploadResponse, PageRequest, Pagination,
};
use crate::services::QuotaGuard;
use crate::store::ContentStore;

/// Image service
pub struct ImageService;

impl ImageService {
    /// One page of images with pagination and quota usage
    pub async fn list_images(
        store: &dyn ContentStore,
        quota: &QuotaGuard,
        page: PageRequest,
    ) -> Result<ImageListResponse> {
        let (images, total) = store.list_images(page).await?;

        Ok(ImageListResponse {
            images,
            pagination: Pagination::new(total, page),
            storage_stats: quota.stats(total),
        })
    }

    /// Validate, encode and store an uploaded image
    pub async fn upload_image(
        store: &dyn ContentStore,
        quota: &QuotaGuard,
        filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImageUploadResponse> {
        if filename.trim().is_empty() {
            return Err(AppError::BadRequest("No image file provided".to_string()));
        }
        if !is_image(filename, content_type) {
            return Err(AppError::BadRequest("Only images are allowed".to_string()));
        }

        quota.check_file_size(bytes.len() as u64)?;

        let count = store.count_images().await?;
        if let Err(e) = quota.check_capacity(count) {
            tracing::warn!("Rejected upload of {}: {} of {} images stored", filename, count, quota.max_files);
            return Err(e);
        }

        // base64 text inflates storage by roughly a third
        let data = STANDARD.encode(bytes);

        let image = store
            .add_image(filename, &data, quota.max_files)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Rejected upload of {}: collection filled concurrently", filename);
                quota.capacity_error()
            })?;

        let used = store.count_images().await?;
        tracing::info!("Stored image {} ({}, {} bytes)", image.id, image.filename, bytes.len());

        Ok(ImageUploadResponse {
            image,
            storage_stats: quota.stats(used),
        })
    }

    /// Delete an image by id
    pub async fn delete_image(
        store: &dyn ContentStore,
        quota: &QuotaGuard,
        id: i64,
    ) -> Result<ImageDeleteResponse> {
        if !store.delete_image(id).await? {
            return Err(AppError::NotFound("Image not found".to_string()));
        }

        let used = store.count_images().await?;
        tracing::info!("Deleted image {}", id);

        Ok(ImageDeleteResponse {
            message: "Image deleted successfully".to_string(),
            storage_stats: quota.stats(used),
        })
    }
}

/// Accept `image/*` content types; fall back to the filename when the client sent none
fn is_image(filename: &str, content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.starts_with("image/"),
        _ => mime_guess::from_path(filename)
            .first()
            .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false),
    }
}
