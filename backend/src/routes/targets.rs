//! Stateless target preview route

use crate::error::ApiError;
use crate::services::TargetsService;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use nutrition_planner_shared::types::TargetsPreviewResponse;
use nutrition_planner_shared::UserProfile;

/// Create target routes
pub fn target_routes() -> Router<AppState> {
    Router::new().route("/preview", post(preview_targets))
}

/// POST /api/v1/targets/preview - Compute targets for an unsaved profile
async fn preview_targets(
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<TargetsPreviewResponse>, ApiError> {
    let Json(profile) = payload?;
    Ok(Json(TargetsService::preview(&profile)?))
}
