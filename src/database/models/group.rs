use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Member;

/// A group row as stored, without its member links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub program_id: String,
    pub location_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A group together with its resolved members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupWithMembers {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<Member>,
}

impl GroupWithMembers {
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }
}

/// Input for creating a group and connecting its initial members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub program_id: String,
    pub location_id: String,
    pub member_ids: Vec<String>,
}

impl NewGroup {
    /// Member ids in first-appearance order with duplicates removed.
    pub fn unique_member_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.member_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Fields an update-many may touch. Membership is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChanges {
    pub name: String,
    pub program_id: Option<String>,
    pub location_id: Option<String>,
}

/// Result of a bulk mutation: how many records matched the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayload {
    pub count: u64,
}

impl BatchPayload {
    pub fn new(count: u64) -> Self {
        Self { count }
    }
}
