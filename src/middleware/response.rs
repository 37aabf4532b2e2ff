use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Successful handler output, sent as `{ "success": true, "data": ... }` with 200
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.data) {
            Ok(data) => Json(envelope(data)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::Internal.into_response()
            }
        }
    }
}

fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
