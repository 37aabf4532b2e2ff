// handlers/protected/groups/create.rs - POST /groups handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::{GroupWithMembers, NewGroup};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

use super::payload::{required, CreateGroupRequest};

/// POST /groups - Create a group and connect its initial members
///
/// Expected Input:
/// ```json
/// { "name": "U10 Boys", "programId": "p1", "locationId": "l1", "memberIds": ["m1", "m2"] }
/// ```
///
/// The group and all member links are written as one unit: an unknown member,
/// program or location id fails the whole request with a 500.
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<GroupWithMembers> {
    let identity = caller.require()?;
    let Json(payload) = payload?;

    let name = required(payload.name, "name", "Name is required")?;
    let program_id = required(payload.program_id, "programId", "Program id is required")?;
    let location_id = required(payload.location_id, "locationId", "Location id is required")?;

    let input = NewGroup {
        name,
        program_id,
        location_id,
        member_ids: payload.member_ids.unwrap_or_default(),
    };

    let group = state
        .store
        .create_group(input)
        .await
        .map_err(|e| ApiError::from_database("groups_post", e))?;

    tracing::info!(
        "Group {} created by {} with {} member(s)",
        group.group.id,
        identity.user_id,
        group.members.len()
    );

    Ok(ApiResponse::success(group))
}
