use std::time::{Duration, Instant};

use crate::database::models::Member;

use super::api::{ClientError, GroupApi};

pub const DEFAULT_MEMBER_TTL: Duration = Duration::from_secs(5 * 60);

/// The member list as last fetched, with an explicit expiry.
///
/// Stale after `ttl` has elapsed since the fetch or after `invalidate`.
#[derive(Debug, Clone)]
pub struct MemberCache {
    entry: Option<(Vec<Member>, Instant)>,
    ttl: Duration,
}

impl Default for MemberCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMBER_TTL)
    }
}

impl MemberCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    pub fn is_stale_at(&self, now: Instant) -> bool {
        match &self.entry {
            Some((_, fetched_at)) => now.saturating_duration_since(*fetched_at) >= self.ttl,
            None => true,
        }
    }

    /// Cached members regardless of freshness
    pub fn members(&self) -> &[Member] {
        self.entry.as_ref().map(|(members, _)| members.as_slice()).unwrap_or(&[])
    }

    pub fn store(&mut self, members: Vec<Member>) {
        self.entry = Some((members, Instant::now()));
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Return fresh members, refetching through `api` when stale
    pub async fn get_or_fetch<A>(&mut self, api: &A) -> Result<&[Member], ClientError>
    where
        A: GroupApi + ?Sized,
    {
        if self.is_stale() {
            let members = api.list_members().await?;
            tracing::debug!("Fetched {} member(s)", members.len());
            self.store(members);
        }
        Ok(self.members())
    }
}
