use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::QueryRejection,
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::handlers::parse_id;
use crate::models::{ImageDeleteResponse, ImageListQuery, ImageListResponse, ImageUploadResponse};
use crate::services::ImageService;
use crate::AppState;

/// Multipart field carrying the upload
const IMAGE_FIELD: &str = "image";

/// List images
/// GET /api/images?page=1&limit=10
pub async fn list_images(
    State(state): State<AppState>,
    query: std::result::Result<Query<ImageListQuery>, QueryRejection>,
) -> Result<Json<ImageListResponse>> {
    let Query(query) = query?;
    let page = query.validate().map_err(AppError::Validation)?;
    let response = ImageService::list_images(state.store.as_ref(), &state.quota, page).await?;
    Ok(Json(response))
}

/// Upload an image
/// POST /api/images (multipart, field "image")
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImageUploadResponse>)> {
    let mut multipart = multipart?;
    let mut upload: Option<(String, Option<String>, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await?;
        upload = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    let response = ImageService::upload_image(
        state.store.as_ref(),
        &state.quota,
        &file_name,
        content_type.as_deref(),
        &data,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete an image
/// DELETE /api/images/:id
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageDeleteResponse>> {
    let id = parse_id(&id, "Invalid image ID")?;
    let response = ImageService::delete_image(state.store.as_ref(), &state.quota, id).await?;
    Ok(Json(response))
}
