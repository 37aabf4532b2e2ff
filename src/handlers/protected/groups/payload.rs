use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `POST /groups`. Every field is optional at the wire level so that
/// missing fields surface as 400s from the handler rather than extractor errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: Option<String>,
    pub program_id: Option<String>,
    pub location_id: Option<String>,
    #[serde(alias = "members")]
    pub member_ids: Option<Vec<String>>,
}

/// Body of `PATCH /groups/:id`. Member links cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub program_id: Option<String>,
    pub location_id: Option<String>,
}

/// Returns the trimmed-non-empty value or a 400 naming the field.
pub fn required(value: Option<String>, field: &str, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::required(field, message)),
    }
}
