use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{
    BatchPayload, Group, GroupChanges, GroupWithMembers, Location, Member, NewGroup, Program,
};

/// Typed access to the relational store backing the admin panel.
///
/// Mutations on groups follow bulk semantics: `update_groups` and
/// `delete_groups` filter by id and report how many rows matched, so a
/// missing id yields `count == 0` rather than an error.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// All groups, unfiltered, oldest first.
    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError>;

    async fn find_group(&self, id: &str) -> Result<Option<GroupWithMembers>, DatabaseError>;

    /// Creates the group and its member links in one unit. Unknown member,
    /// program or location ids fail the whole call with `Constraint`.
    async fn create_group(&self, input: NewGroup) -> Result<GroupWithMembers, DatabaseError>;

    async fn update_groups(&self, id: &str, changes: GroupChanges) -> Result<BatchPayload, DatabaseError>;

    /// Removes matching groups; their member links go with them.
    async fn delete_groups(&self, id: &str) -> Result<BatchPayload, DatabaseError>;

    async fn list_members(&self) -> Result<Vec<Member>, DatabaseError>;

    async fn list_programs(&self) -> Result<Vec<Program>, DatabaseError>;

    async fn list_locations(&self) -> Result<Vec<Location>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
