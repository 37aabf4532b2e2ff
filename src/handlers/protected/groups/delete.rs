// handlers/protected/groups/delete.rs - DELETE /groups/:id handler

use axum::extract::{Path, State};

use crate::database::models::BatchPayload;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

/// DELETE /groups/:id - Remove a group and its member links.
/// Idempotent: deleting a missing group returns `{ "count": 0 }`.
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<BatchPayload> {
    let identity = caller.require()?;

    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Group id is required"));
    }

    let result = state
        .store
        .delete_groups(&id)
        .await
        .map_err(|e| ApiError::from_database("group_delete", e))?;

    tracing::info!("Group {} deleted by {} ({} matched)", id, identity.user_id, result.count);

    Ok(ApiResponse::success(result))
}
