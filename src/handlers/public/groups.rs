// handlers/public/groups.rs - GET /groups and GET /groups/:id

use axum::extract::{Path, State};

use crate::database::models::{Group, GroupWithMembers};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /groups - Every group, unfiltered and unpaginated
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    let groups = state
        .store
        .list_groups()
        .await
        .map_err(|e| ApiError::from_database("groups_get", e))?;

    Ok(ApiResponse::success(groups))
}

/// GET /groups/:id - One group with its members, as loaded by the edit page
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GroupWithMembers> {
    let group = state
        .store
        .find_group(&id)
        .await
        .map_err(|e| ApiError::from_database("group_get", e))?
        .ok_or_else(|| ApiError::not_found(format!("Group '{}' not found", id)))?;

    Ok(ApiResponse::success(group))
}
