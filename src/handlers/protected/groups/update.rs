// handlers/protected/groups/update.rs - PATCH /groups/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::{BatchPayload, GroupChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

use super::payload::{required, UpdateGroupRequest};

/// PATCH /groups/:id - Rename a group or move it to another program/location
///
/// Bulk semantics: the response is `{ "count": n }` and an unknown id simply
/// yields `count == 0`. Member links are not touched by this endpoint.
/// An absent reference keeps the current value; any supplied one, even empty,
/// is written and must exist.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> ApiResult<BatchPayload> {
    let identity = caller.require()?;
    let Json(payload) = payload?;

    let name = required(payload.name, "name", "Name is required")?;
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Group id is required"));
    }

    let changes = GroupChanges {
        name,
        program_id: payload.program_id,
        location_id: payload.location_id,
    };

    let result = state
        .store
        .update_groups(&id, changes)
        .await
        .map_err(|e| ApiError::from_database("group_patch", e))?;

    tracing::info!("Group {} updated by {} ({} matched)", id, identity.user_id, result.count);

    Ok(ApiResponse::success(result))
}
