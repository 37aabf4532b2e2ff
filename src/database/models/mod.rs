pub mod group;
pub mod location;
pub mod member;
pub mod program;

pub use group::{BatchPayload, Group, GroupChanges, GroupWithMembers, NewGroup};
pub use location::Location;
pub use member::Member;
pub use program::Program;
