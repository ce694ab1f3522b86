//! Profile onboarding, finalization and intake routes

use crate::error::ApiError;
use crate::services::{IntakeService, ProfileService};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use nutrition_planner_shared::types::{
    DailyReportResponse, IntakeLogResponse, LogIntakeRequest, ProfileResponse, ReportQuery,
    StoredTargetsResponse, UpdateProfileRequest,
};
use uuid::Uuid;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile))
        .route("/:id", get(get_profile).patch(update_profile))
        .route("/:id/finalize", post(finalize_profile))
        .route("/:id/targets", get(get_targets))
        .route("/:id/intake", post(log_intake))
        .route("/:id/report", get(get_report))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid profile id: {}", raw)))
}

/// POST /api/v1/profiles - Start onboarding with an empty profile
async fn create_profile(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let response = ProfileService::create(state.store()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/profiles/:id
async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ProfileService::get(state.store(), id).await?))
}

/// PATCH /api/v1/profiles/:id - Merge one onboarding step
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    Ok(Json(ProfileService::update(state.store(), id, req).await?))
}

/// POST /api/v1/profiles/:id/finalize - Snapshot the computed targets
async fn finalize_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredTargetsResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ProfileService::finalize(state.store(), id).await?))
}

/// GET /api/v1/profiles/:id/targets - Targets from the last finalization
async fn get_targets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredTargetsResponse>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ProfileService::stored_targets(state.store(), id).await?))
}

/// POST /api/v1/profiles/:id/intake - Log a food or supplement
async fn log_intake(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LogIntakeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IntakeLogResponse>), ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let response = IntakeService::log(state.store(), &state.config().limits, id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/profiles/:id/report?date=YYYY-MM-DD&energyUnit=kJ
async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<DailyReportResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Query(query) = query?;
    let energy_unit = query.energy_unit.unwrap_or_default();
    Ok(Json(
        IntakeService::report(state.store(), id, query.date, energy_unit).await?,
    ))
}
