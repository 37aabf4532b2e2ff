// handlers/public/mod.rs - Read-only endpoints, no caller identity required
pub mod groups;
pub mod lookup;
pub mod system;

pub use groups::list as groups_list;
pub use groups::show as groups_show;
pub use lookup::{locations_list, members_list, programs_list};
pub use system::{health, root};
