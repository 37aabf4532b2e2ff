//! PostgreSQL implementation of [`GroupStore`].
//!
//! Schema management lives outside this crate. The queries below expect:
//!
//! ```sql
//! CREATE TABLE programs  (id TEXT PRIMARY KEY, name TEXT NOT NULL);
//! CREATE TABLE locations (id TEXT PRIMARY KEY, name TEXT NOT NULL);
//! CREATE TABLE members   (id TEXT PRIMARY KEY, name TEXT NOT NULL);
//! CREATE TABLE groups (
//!     id          TEXT PRIMARY KEY,
//!     name        TEXT NOT NULL CHECK (name <> ''),
//!     program_id  TEXT NOT NULL REFERENCES programs(id),
//!     location_id TEXT NOT NULL REFERENCES locations(id),
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! CREATE TABLE group_members (
//!     group_id  TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
//!     member_id TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
//!     PRIMARY KEY (group_id, member_id)
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    BatchPayload, Group, GroupChanges, GroupWithMembers, Location, Member, NewGroup, Program,
};
use super::store::GroupStore;

const GROUP_COLUMNS: &str = "id, name, program_id, location_id, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn members_of(&self, group_id: &str) -> Result<Vec<Member>, DatabaseError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT m.id, m.name
            FROM members m
            JOIN group_members gm ON gm.member_id = m.id
            WHERE gm.group_id = $1
            ORDER BY m.name
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

/// Reorders fetched members to follow the requested id order.
fn order_by_ids(ids: &[String], mut members: Vec<Member>) -> Vec<Member> {
    members.sort_by_key(|m| ids.iter().position(|id| *id == m.id).unwrap_or(usize::MAX));
    members
}

#[async_trait]
impl GroupStore for PgStore {
    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError> {
        let sql = format!("SELECT {} FROM groups ORDER BY created_at, id", GROUP_COLUMNS);
        let groups = sqlx::query_as::<_, Group>(&sql).fetch_all(&self.pool).await?;
        Ok(groups)
    }

    async fn find_group(&self, id: &str) -> Result<Option<GroupWithMembers>, DatabaseError> {
        let sql = format!("SELECT {} FROM groups WHERE id = $1", GROUP_COLUMNS);
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match group {
            Some(group) => {
                let members = self.members_of(&group.id).await?;
                Ok(Some(GroupWithMembers { group, members }))
            }
            None => Ok(None),
        }
    }

    async fn create_group(&self, input: NewGroup) -> Result<GroupWithMembers, DatabaseError> {
        let member_ids = input.unique_member_ids();
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO groups (id, name, program_id, location_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            GROUP_COLUMNS
        );
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .bind(&input.program_id)
            .bind(&input.location_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        for member_id in &member_ids {
            sqlx::query("INSERT INTO group_members (group_id, member_id) VALUES ($1, $2)")
                .bind(&group.id)
                .bind(member_id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::from_sqlx)?;
        }

        let members = sqlx::query_as::<_, Member>("SELECT id, name FROM members WHERE id = ANY($1)")
            .bind(&member_ids)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(GroupWithMembers {
            group,
            members: order_by_ids(&member_ids, members),
        })
    }

    async fn update_groups(&self, id: &str, changes: GroupChanges) -> Result<BatchPayload, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET name = $2,
                program_id = COALESCE($3, program_id),
                location_id = COALESCE($4, location_id),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.program_id)
        .bind(&changes.location_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(BatchPayload::new(result.rows_affected()))
    }

    async fn delete_groups(&self, id: &str) -> Result<BatchPayload, DatabaseError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        Ok(BatchPayload::new(result.rows_affected()))
    }

    async fn list_members(&self) -> Result<Vec<Member>, DatabaseError> {
        let members = sqlx::query_as::<_, Member>("SELECT id, name FROM members ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn list_programs(&self) -> Result<Vec<Program>, DatabaseError> {
        let programs = sqlx::query_as::<_, Program>("SELECT id, name FROM programs ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(programs)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DatabaseError> {
        let locations = sqlx::query_as::<_, Location>("SELECT id, name FROM locations ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
