//! Repository traits (ports) - define the interface for ledger access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).
//!
//! Every mutating method is a single atomic conditional update. Implementations
//! map "the ledger could not be reached in time" to `DomainError::StoreUnavailable`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Code, GuildEntitlement, RedemptionGrant, RedemptionReceipt, VoteRecord};
use crate::error::DomainError;
use crate::value_objects::{RedemptionCode, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Code Repository
// ============================================================================

#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Find code by its canonical identifier
    async fn find_by_code(&self, code: &RedemptionCode) -> RepoResult<Option<Code>>;

    /// All codes, oldest first
    async fn list_all(&self) -> RepoResult<Vec<Code>>;

    /// Active codes, oldest first
    async fn list_active(&self) -> RepoResult<Vec<Code>>;

    /// Insert a new code unless the identifier is taken.
    ///
    /// Returns `false` when a code with the same identifier already exists.
    async fn insert_if_absent(&self, code: &Code) -> RepoResult<bool>;

    /// Flip `is_active` to false. Returns `None` if the code does not exist.
    async fn deactivate(&self, code: &RedemptionCode) -> RepoResult<Option<Code>>;
}

// ============================================================================
// Entitlement Repository
// ============================================================================

#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    /// Stored record for a guild, if any
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildEntitlement>>;

    /// Records with `premium_expires_at > now`
    async fn list_active(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>>;

    /// Records with `premium_expires_at < now`
    async fn list_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>>;

    /// Records with `from <= premium_expires_at < until`
    async fn list_expiring_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepoResult<Vec<GuildEntitlement>>;

    /// Delete the record only if it is still expired at `now`.
    ///
    /// Returns `false` when the record is gone or was renewed meanwhile.
    async fn delete_if_expired(&self, guild_id: Snowflake, now: DateTime<Utc>)
        -> RepoResult<bool>;

    /// Atomically consume one use of the code and record it on the guild.
    ///
    /// Both the code's `current_uses` increment and the guild's entitlement
    /// update are applied together or not at all. Losing a race surfaces as
    /// `CodeInactive`, `CodeExhausted` or `AlreadyRedeemedByGuild`; a missing
    /// code as `CodeNotFound`.
    async fn apply_redemption(&self, grant: &RedemptionGrant) -> RepoResult<RedemptionReceipt>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Find a user's vote record
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<VoteRecord>>;

    /// All records by `total_votes` desc, ties by first-vote order
    async fn list_ranked(&self) -> RepoResult<Vec<VoteRecord>>;

    /// The first `limit` records of `list_ranked`
    async fn top(&self, limit: usize) -> RepoResult<Vec<VoteRecord>>;

    /// Create-or-increment the user's record and append `at` to its history
    async fn record_vote(
        &self,
        user_id: Snowflake,
        username: Option<&str>,
        at: DateTime<Utc>,
    ) -> RepoResult<VoteRecord>;
}

// ============================================================================
// Health
// ============================================================================

#[async_trait]
pub trait LedgerHealth: Send + Sync {
    /// Cheap round trip to the ledger
    async fn ping(&self) -> RepoResult<()>;
}
