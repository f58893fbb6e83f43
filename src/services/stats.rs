use chrono::Utc;

use crate::error::Result;
use crate::models::{ImageStats, Limits, MessageStats, StatsResponse, StorageEstimate};
use crate::services::quota::round_to;
use crate::services::QuotaGuard;
use crate::store::ContentStore;

/// Aggregate statistics service
pub struct StatsService;

impl StatsService {
    pub async fn collect(store: &dyn ContentStore, quota: &QuotaGuard) -> Result<StatsResponse> {
        let image_count = store.count_images().await?;
        let message_count = store.count_messages().await?;
        let data_bytes = store.image_data_bytes().await? as f64;

        let usage = quota.stats(image_count);

        Ok(StatsResponse {
            images: ImageStats {
                count: image_count,
                max_files: quota.max_files,
                remaining: usage.remaining,
                percent_used: usage.percent_used,
            },
            messages: MessageStats {
                count: message_count,
            },
            storage: StorageEstimate {
                estimated_kb: round_to(data_bytes / 1024.0, 1),
                estimated_mb: round_to(data_bytes / (1024.0 * 1024.0), 2),
                backend: store.backend_name().to_string(),
            },
            limits: Limits {
                max_file_size: quota.max_file_size,
                max_file_size_mb: quota.max_file_size_mb(),
                max_files: quota.max_files,
            },
            server_time: Utc::now().to_rfc3339(),
        })
    }
}
