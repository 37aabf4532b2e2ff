// handlers/protected/mod.rs - Mutating endpoints, caller identity required
pub mod groups;

pub use groups::create as groups_create;
pub use groups::delete as groups_delete;
pub use groups::update as groups_update;
