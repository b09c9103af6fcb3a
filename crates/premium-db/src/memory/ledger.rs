//! In-memory ledger
//!
//! Implements every ledger port over sharded maps. A redemption holds the
//! code entry lock and then the guild entry lock, the same order the
//! PostgreSQL transaction takes row locks in, so both mutations are applied
//! under mutual exclusion with any competing redemption.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::instrument;

use premium_core::{
    Code, CodeRepository, DomainError, EntitlementRepository, GuildEntitlement, LedgerHealth,
    RedemptionCode, RedemptionGrant, RedemptionReceipt, RepoResult, Snowflake, VoteRecord,
    VoteRepository,
};

#[derive(Debug, Clone)]
struct RankedVote {
    seq: u64,
    record: VoteRecord,
}

/// Ledger store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryLedger {
    codes: DashMap<RedemptionCode, Code>,
    entitlements: DashMap<Snowflake, GuildEntitlement>,
    votes: DashMap<Snowflake, RankedVote>,
    vote_seq: AtomicU64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_entitlements<F>(&self, keep: F) -> Vec<GuildEntitlement>
    where
        F: Fn(&GuildEntitlement) -> bool,
    {
        let mut found: Vec<GuildEntitlement> = self
            .entitlements
            .iter()
            .filter(|e| keep(e.value()))
            .map(|e| e.value().clone())
            .collect();
        found.sort_by_key(|e| (e.premium_expires_at, e.guild_id));
        found
    }

    fn sorted_codes<F>(&self, keep: F) -> Vec<Code>
    where
        F: Fn(&Code) -> bool,
    {
        let mut found: Vec<Code> = self
            .codes
            .iter()
            .filter(|c| keep(c.value()))
            .map(|c| c.value().clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.code.cmp(&b.code)));
        found
    }
}

#[async_trait]
impl CodeRepository for MemoryLedger {
    async fn find_by_code(&self, code: &RedemptionCode) -> RepoResult<Option<Code>> {
        Ok(self.codes.get(code).map(|c| c.value().clone()))
    }

    async fn list_all(&self) -> RepoResult<Vec<Code>> {
        Ok(self.sorted_codes(|_| true))
    }

    async fn list_active(&self) -> RepoResult<Vec<Code>> {
        Ok(self.sorted_codes(|c| c.is_active))
    }

    async fn insert_if_absent(&self, code: &Code) -> RepoResult<bool> {
        match self.codes.entry(code.code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
                Ok(true)
            }
        }
    }

    async fn deactivate(&self, code: &RedemptionCode) -> RepoResult<Option<Code>> {
        Ok(self.codes.get_mut(code).map(|mut c| {
            c.is_active = false;
            c.value().clone()
        }))
    }
}

#[async_trait]
impl EntitlementRepository for MemoryLedger {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildEntitlement>> {
        Ok(self.entitlements.get(&guild_id).map(|e| e.value().clone()))
    }

    async fn list_active(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        Ok(self.collect_entitlements(|e| e.is_active(now)))
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        Ok(self.collect_entitlements(|e| e.is_expired(now)))
    }

    async fn list_expiring_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepoResult<Vec<GuildEntitlement>> {
        Ok(self.collect_entitlements(|e| {
            e.premium_expires_at
                .is_some_and(|expires| expires >= from && expires < until)
        }))
    }

    async fn delete_if_expired(
        &self,
        guild_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        Ok(self
            .entitlements
            .remove_if(&guild_id, |_, e| e.is_expired(now))
            .is_some())
    }

    #[instrument(skip(self, grant), fields(guild_id = %grant.guild_id, code = %grant.code))]
    async fn apply_redemption(&self, grant: &RedemptionGrant) -> RepoResult<RedemptionReceipt> {
        let mut code = self
            .codes
            .get_mut(&grant.code)
            .ok_or_else(|| DomainError::CodeNotFound(grant.code.to_string()))?;
        code.ensure_redeemable()?;

        let entitlement = match self.entitlements.entry(grant.guild_id) {
            Entry::Occupied(mut slot) => {
                slot.get_mut()
                    .apply_redemption(&code, grant.role_id, grant.redeemed_at)?;
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                let mut fresh = GuildEntitlement::empty(grant.guild_id, grant.redeemed_at);
                fresh.apply_redemption(&code, grant.role_id, grant.redeemed_at)?;
                slot.insert(fresh).value().clone()
            }
        };

        code.consume_use();

        Ok(RedemptionReceipt {
            entitlement,
            code: code.value().clone(),
        })
    }
}

#[async_trait]
impl VoteRepository for MemoryLedger {
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<VoteRecord>> {
        Ok(self.votes.get(&user_id).map(|v| v.record.clone()))
    }

    async fn list_ranked(&self) -> RepoResult<Vec<VoteRecord>> {
        let mut ranked: Vec<RankedVote> = self.votes.iter().map(|v| v.value().clone()).collect();
        ranked.sort_by(|a, b| {
            b.record
                .total_votes
                .cmp(&a.record.total_votes)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        Ok(ranked.into_iter().map(|v| v.record).collect())
    }

    async fn top(&self, limit: usize) -> RepoResult<Vec<VoteRecord>> {
        let mut ranked = self.list_ranked().await?;
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn record_vote(
        &self,
        user_id: Snowflake,
        username: Option<&str>,
        at: DateTime<Utc>,
    ) -> RepoResult<VoteRecord> {
        let username = username.map(str::to_string);
        let record = match self.votes.entry(user_id) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().record.record(username, at);
                slot.get().record.clone()
            }
            Entry::Vacant(slot) => {
                let seq = self.vote_seq.fetch_add(1, Ordering::Relaxed);
                let record = VoteRecord::first(user_id, username, at);
                slot.insert(RankedVote {
                    seq,
                    record: record.clone(),
                });
                record
            }
        };
        Ok(record)
    }
}

#[async_trait]
impl LedgerHealth for MemoryLedger {
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
