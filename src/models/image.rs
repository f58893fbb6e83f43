use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{FieldError, StorageStats};

/// Stored image. `data` is the base64 text of the uploaded bytes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub filename: String,
    pub data: String,
}

impl Image {
    /// Size of the decoded file in bytes, computed from the base64 length
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// Largest page size served by the image listing
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Image list query parameters. Kept as text so a malformed number is reported per field.
#[derive(Debug, Default, Deserialize)]
pub struct ImageListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Parse an optional positive integer; missing or empty means `None`
fn parse_positive(raw: Option<&str>) -> Result<Option<u64>, ()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(()),
        },
    }
}

impl ImageListQuery {
    /// Apply defaults and bounds. `limit` above the cap is clamped, values below 1 are rejected.
    pub fn validate(&self) -> Result<PageRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let page = match parse_positive(self.page.as_deref()) {
            Ok(page) if page.unwrap_or(1) <= u64::from(u32::MAX) => page.unwrap_or(1) as u32,
            _ => {
                errors.push(FieldError::new("page", "Page must be a positive integer"));
                1
            }
        };

        let limit = match parse_positive(self.limit.as_deref()) {
            Ok(limit) => limit
                .unwrap_or(u64::from(DEFAULT_PAGE_LIMIT))
                .min(u64::from(MAX_PAGE_LIMIT)) as u32,
            Err(()) => {
                errors.push(FieldError::new("limit", "Limit must be a positive integer"));
                DEFAULT_PAGE_LIMIT
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PageRequest { page, limit })
    }
}

/// Pagination block of the image listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

/// GET /api/images response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResponse {
    pub images: Vec<Image>,
    pub pagination: Pagination,
    pub storage_stats: StorageStats,
}

/// POST /api/images response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image: Image,
    pub storage_stats: StorageStats,
}

/// DELETE /api/images/:id response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDeleteResponse {
    pub message: String,
    pub storage_stats: StorageStats,
}
