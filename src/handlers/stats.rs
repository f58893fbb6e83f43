use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::StatsResponse;
use crate::services::StatsService;
use crate::AppState;

/// Aggregate counts, estimated storage and limits
/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = StatsService::collect(state.store.as_ref(), &state.quota).await?;
    Ok(Json(stats))
}
