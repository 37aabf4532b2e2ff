// handlers/public/lookup.rs - Read-only lists backing the group form selects

use axum::extract::State;

use crate::database::models::{Location, Member, Program};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /members
pub async fn members_list(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    let members = state
        .store
        .list_members()
        .await
        .map_err(|e| ApiError::from_database("members_get", e))?;
    Ok(ApiResponse::success(members))
}

/// GET /programs
pub async fn programs_list(State(state): State<AppState>) -> ApiResult<Vec<Program>> {
    let programs = state
        .store
        .list_programs()
        .await
        .map_err(|e| ApiError::from_database("programs_get", e))?;
    Ok(ApiResponse::success(programs))
}

/// GET /locations
pub async fn locations_list(State(state): State<AppState>) -> ApiResult<Vec<Location>> {
    let locations = state
        .store
        .list_locations()
        .await
        .map_err(|e| ApiError::from_database("locations_get", e))?;
    Ok(ApiResponse::success(locations))
}
