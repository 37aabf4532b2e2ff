pub mod groups;
pub mod lookup;
pub mod token;
