use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::auth::{decode_jwt, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated staff member making the request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

/// Caller identity resolved from the bearer token, or `None` for anonymous requests.
///
/// Extraction never rejects; handlers decide whether an identity is required
/// so that the check happens before any payload validation.
#[derive(Clone, Debug)]
pub struct Caller(pub Option<CallerIdentity>);

impl Caller {
    pub fn require(self) -> Result<CallerIdentity, ApiError> {
        self.0.ok_or_else(ApiError::unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Caller(resolve_caller(&parts.headers, &state.jwt_secret)))
    }
}

fn resolve_caller(headers: &HeaderMap, secret: &str) -> Option<CallerIdentity> {
    let token = match extract_jwt_from_headers(headers) {
        Ok(token) => token,
        Err(msg) => {
            tracing::debug!("Anonymous request: {}", msg);
            return None;
        }
    };

    match decode_jwt(&token, secret) {
        Ok(claims) => Some(CallerIdentity::from(claims)),
        Err(e) => {
            tracing::warn!("Rejected caller token: {}", e);
            None
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
