use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    BatchPayload, Group, GroupChanges, GroupWithMembers, Location, Member, NewGroup, Program,
};
use super::seed::SeedData;
use super::store::GroupStore;

#[derive(Default)]
struct Tables {
    groups: Vec<Group>,
    members: Vec<Member>,
    programs: Vec<Program>,
    locations: Vec<Location>,
    /// group id -> member ids
    links: HashMap<String, Vec<String>>,
}

impl Tables {
    fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    fn check_program(&self, id: &str) -> Result<(), DatabaseError> {
        if self.programs.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(DatabaseError::Constraint(format!("program '{}' does not exist", id)))
        }
    }

    fn check_location(&self, id: &str) -> Result<(), DatabaseError> {
        if self.locations.iter().any(|l| l.id == id) {
            Ok(())
        } else {
            Err(DatabaseError::Constraint(format!("location '{}' does not exist", id)))
        }
    }

    fn members_of(&self, group_id: &str) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .links
            .get(group_id)
            .map(|ids| ids.iter().filter_map(|id| self.member(id).cloned()).collect())
            .unwrap_or_default();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }
}

/// In-process store with the same referential rules as the PostgreSQL schema.
/// Every operation runs under a single write or read lock, so each call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: SeedData) -> Self {
        Self {
            tables: RwLock::new(Tables {
                members: seed.members,
                programs: seed.programs,
                locations: seed.locations,
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError> {
        Ok(self.tables.read().await.groups.clone())
    }

    async fn find_group(&self, id: &str) -> Result<Option<GroupWithMembers>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.id == id).map(|group| GroupWithMembers {
            group: group.clone(),
            members: tables.members_of(&group.id),
        }))
    }

    async fn create_group(&self, input: NewGroup) -> Result<GroupWithMembers, DatabaseError> {
        let mut tables = self.tables.write().await;

        tables.check_program(&input.program_id)?;
        tables.check_location(&input.location_id)?;

        let member_ids = input.unique_member_ids();
        let members = member_ids
            .iter()
            .map(|id| {
                tables
                    .member(id)
                    .cloned()
                    .ok_or_else(|| DatabaseError::Constraint(format!("member '{}' does not exist", id)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            program_id: input.program_id,
            location_id: input.location_id,
            created_at: now,
            updated_at: now,
        };

        tables.links.insert(group.id.clone(), member_ids);
        tables.groups.push(group.clone());

        Ok(GroupWithMembers { group, members })
    }

    async fn update_groups(&self, id: &str, changes: GroupChanges) -> Result<BatchPayload, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.groups.iter().any(|g| g.id == id) {
            return Ok(BatchPayload::new(0));
        }
        if let Some(program_id) = &changes.program_id {
            tables.check_program(program_id)?;
        }
        if let Some(location_id) = &changes.location_id {
            tables.check_location(location_id)?;
        }

        let mut count = 0;
        for group in tables.groups.iter_mut().filter(|g| g.id == id) {
            group.name = changes.name.clone();
            if let Some(program_id) = &changes.program_id {
                group.program_id = program_id.clone();
            }
            if let Some(location_id) = &changes.location_id {
                group.location_id = location_id.clone();
            }
            group.updated_at = Utc::now();
            count += 1;
        }

        Ok(BatchPayload::new(count))
    }

    async fn delete_groups(&self, id: &str) -> Result<BatchPayload, DatabaseError> {
        let mut tables = self.tables.write().await;

        let before = tables.groups.len();
        tables.groups.retain(|g| g.id != id);
        let count = (before - tables.groups.len()) as u64;

        // cascade
        if count > 0 {
            tables.links.remove(id);
        }

        Ok(BatchPayload::new(count))
    }

    async fn list_members(&self) -> Result<Vec<Member>, DatabaseError> {
        let mut members = self.tables.read().await.members.clone();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(members)
    }

    async fn list_programs(&self) -> Result<Vec<Program>, DatabaseError> {
        let mut programs = self.tables.read().await.programs.clone();
        programs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(programs)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DatabaseError> {
        let mut locations = self.tables.read().await.locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
