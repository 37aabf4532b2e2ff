// handlers/protected/groups/mod.rs - Group mutations
pub mod create;   // POST /groups
pub mod delete;   // DELETE /groups/:id
pub mod payload;  // request bodies and field checks
pub mod update;   // PATCH /groups/:id

pub use create::create;
pub use delete::delete;
pub use payload::{CreateGroupRequest, UpdateGroupRequest};
pub use update::update;
