use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::manager::DatabaseError;
use super::models::{Location, Member, Program};

/// Lookup data loaded into the in-memory store at startup.
///
/// ```yaml
/// programs:
///   - { id: p1, name: Gimnastika }
/// locations:
///   - { id: l1, name: Dvorana Sokol }
/// members:
///   - { id: m1, name: Ana Horvat }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl SeedData {
    /// Parse and check that ids are unique within each entity type
    pub fn from_yaml(source: &str) -> Result<Self, DatabaseError> {
        let seed: Self = serde_yaml::from_str(source).map_err(|e| DatabaseError::Seed(e.to_string()))?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        unique_ids("programs", self.programs.iter().map(|p| p.id.as_str()))?;
        unique_ids("locations", self.locations.iter().map(|l| l.id.as_str()))?;
        unique_ids("members", self.members.iter().map(|m| m.id.as_str()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::Seed(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&source)
    }
}

fn unique_ids<'a>(entity: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), DatabaseError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DatabaseError::Seed(format!("duplicate {} id '{}'", entity, id)));
        }
    }
    Ok(())
}
