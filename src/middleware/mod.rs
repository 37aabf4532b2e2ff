pub mod auth;
pub mod response;

pub use auth::{Caller, CallerIdentity};
pub use response::{ApiResponse, ApiResult};
