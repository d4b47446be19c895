//! Usage statistics handlers. Both run behind the auth gate and never
//! surface store failures to the client.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::stats::UsageStats;

/// Get usage statistics
///
/// GET /api/stats
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Aggregate counters (defaults when the store is down)", body = ApiResponse<UsageStats>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Stats"
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<UsageStats>> {
    Json(ApiResponse::success(state.stats.fetch().await))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetData {
    #[schema(example = "Statistics reset successfully")]
    pub message: String,
    pub stats: UsageStats,
}

/// Reset usage statistics
///
/// POST /api/stats/reset
#[utoipa::path(
    post,
    path = "/api/stats/reset",
    responses(
        (status = 200, description = "Counters zeroed", body = ApiResponse<ResetData>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Stats"
)]
pub async fn reset_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ResetData>> {
    let stats = state.stats.reset().await;
    Json(ApiResponse::success(ResetData {
        message: "Statistics reset successfully".to_string(),
        stats,
    }))
}
