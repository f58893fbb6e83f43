use serde::{Deserialize, Serialize};

/// Image quota usage reported alongside image responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub used: u64,
    pub total: u64,
    pub percent_used: f64,
    pub remaining: u64,
}

/// GET /api/stats response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub images: ImageStats,
    pub messages: MessageStats,
    pub storage: StorageEstimate,
    pub limits: Limits,
    pub server_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub count: u64,
    pub max_files: u64,
    pub remaining: u64,
    pub percent_used: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageStats {
    pub count: u64,
}

/// Estimated size of the stored base64 image text
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageEstimate {
    #[serde(rename = "estimatedKB")]
    pub estimated_kb: f64,
    #[serde(rename = "estimatedMB")]
    pub estimated_mb: f64,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub max_file_size: u64,
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: f64,
    pub max_files: u64,
}
