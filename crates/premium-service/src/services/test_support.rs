//! Fakes shared by the service tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use premium_core::{
    Code, CodeRepository, DirectoryError, DomainError, EntitlementRepository, GuildEntitlement,
    ManualClock, MemberDirectory, RedemptionCode, RedemptionGrant, RedemptionReceipt, RepoResult,
    RevocationReport, Snowflake,
};
use premium_db::MemoryLedger;

use super::context::{ServiceContext, ServiceContextBuilder, ServiceSettings};

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// In-memory directory: guild roles, per-guild members holding the premium
/// role, and known usernames.
#[derive(Default)]
pub(crate) struct FakeDirectory {
    pub roles: Mutex<HashSet<(Snowflake, Snowflake)>>,
    pub members_with_role: Mutex<HashMap<Snowflake, usize>>,
    pub unreachable_guilds: Mutex<HashSet<Snowflake>>,
    pub usernames: Mutex<HashMap<Snowflake, String>>,
    pub revoked: Mutex<Vec<(Snowflake, Snowflake)>>,
    pub fail_lookups: Mutex<bool>,
}

impl FakeDirectory {
    pub fn with_role(self, guild_id: Snowflake, role_id: Snowflake) -> Self {
        self.roles.lock().insert((guild_id, role_id));
        self
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn role_exists(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<bool, DirectoryError> {
        if *self.fail_lookups.lock() {
            return Err(DirectoryError::Request("connection reset".into()));
        }
        Ok(self.roles.lock().contains(&(guild_id, role_id)))
    }

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<RevocationReport, DirectoryError> {
        if self.unreachable_guilds.lock().contains(&guild_id) {
            return Err(DirectoryError::GuildUnavailable(guild_id));
        }
        self.revoked.lock().push((guild_id, role_id));
        let members = self.members_with_role.lock().remove(&guild_id).unwrap_or(0);
        Ok(RevocationReport {
            members_revoked: members,
            members_failed: 0,
        })
    }

    async fn username(&self, user_id: Snowflake) -> Result<Option<String>, DirectoryError> {
        if *self.fail_lookups.lock() {
            return Err(DirectoryError::Unauthorized);
        }
        Ok(self.usernames.lock().get(&user_id).cloned())
    }
}

/// Entitlement store that fails the first `failures` redemptions with a
/// transient error before delegating.
pub(crate) struct FlakyEntitlements {
    pub inner: Arc<MemoryLedger>,
    pub failures: AtomicU32,
    pub calls: AtomicU32,
}

#[async_trait]
impl EntitlementRepository for FlakyEntitlements {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildEntitlement>> {
        EntitlementRepository::find(self.inner.as_ref(), guild_id).await
    }

    async fn list_active(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        EntitlementRepository::list_active(self.inner.as_ref(), now).await
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        self.inner.list_expired(now).await
    }

    async fn list_expiring_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepoResult<Vec<GuildEntitlement>> {
        self.inner.list_expiring_between(from, until).await
    }

    async fn delete_if_expired(
        &self,
        guild_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        self.inner.delete_if_expired(guild_id, now).await
    }

    async fn apply_redemption(&self, grant: &RedemptionGrant) -> RepoResult<RedemptionReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::StoreUnavailable("serialization failure".into()));
        }
        self.inner.apply_redemption(grant).await
    }
}

/// A wired context over a fresh in-memory ledger
pub(crate) struct Harness {
    pub ledger: Arc<MemoryLedger>,
    pub directory: Arc<FakeDirectory>,
    pub clock: Arc<ManualClock>,
    pub ctx: ServiceContext,
}

impl Harness {
    pub fn new(directory: FakeDirectory) -> Self {
        Self::with_settings(directory, ServiceSettings::default())
    }

    pub fn with_settings(directory: FakeDirectory, settings: ServiceSettings) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        let directory = Arc::new(directory);
        let clock = Arc::new(ManualClock::new(t0()));
        let ctx = ServiceContextBuilder::new()
            .ledger(ledger.clone())
            .directory(directory.clone())
            .clock(clock.clone())
            .settings(settings)
            .build()
            .unwrap();

        Self {
            ledger,
            directory,
            clock,
            ctx,
        }
    }

    /// Insert an active code created at the current clock time
    pub async fn seed_code(&self, code: &str, days: i32, max_uses: i32) -> RedemptionCode {
        let code = RedemptionCode::parse(code).unwrap();
        let record = Code::new(
            code.clone(),
            days,
            max_uses,
            &premium_core::Actor::AdminKey,
            premium_core::Clock::now(self.clock.as_ref()),
        );
        assert!(self.ledger.insert_if_absent(&record).await.unwrap());
        code
    }
}
