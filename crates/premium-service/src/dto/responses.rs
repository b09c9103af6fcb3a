//! Response DTOs for API endpoints
//!
//! Field names are camelCase, matching the dashboard that reads them.

use chrono::{DateTime, Utc};
use premium_core::{Code, GuildEntitlement, RedemptionReceipt, Snowflake, VoteRecord};
use serde::Serialize;

/// Number of votes shown as "recent" in voter details
pub const RECENT_VOTES: usize = 5;

// ============================================================================
// Codes
// ============================================================================

/// Full code view for privileged callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    pub code: String,
    pub premium_days: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    pub remaining_uses: i32,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<Code> for CodeResponse {
    fn from(code: Code) -> Self {
        Self {
            remaining_uses: code.remaining_uses(),
            code: code.code.into_inner(),
            premium_days: code.premium_days,
            max_uses: code.max_uses,
            current_uses: code.current_uses,
            is_active: code.is_active,
            created_by: code.created_by,
            created_at: code.created_at,
        }
    }
}

/// Public code view; never carries the creator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCodeResponse {
    pub code: String,
    pub premium_days: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Code> for PublicCodeResponse {
    fn from(code: Code) -> Self {
        Self {
            code: code.code.into_inner(),
            premium_days: code.premium_days,
            max_uses: code.max_uses,
            current_uses: code.current_uses,
            is_active: code.is_active,
            created_at: code.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeGenerationFailure {
    /// Position in the requested batch, zero-based
    pub index: u32,
    pub reason: String,
}

/// Result of a batch generation; partial success is not an error
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBatchResponse {
    pub requested: u32,
    pub premium_days: i32,
    pub max_uses: i32,
    pub created: Vec<CodeResponse>,
    pub failures: Vec<CodeGenerationFailure>,
}

// ============================================================================
// Entitlements
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildStatusResponse {
    pub guild_id: Snowflake,
    pub premium_active: bool,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub days_remaining: i64,
    pub premium_role_id: Option<Snowflake>,
    pub redeemed_codes_count: usize,
}

impl GuildStatusResponse {
    pub fn at(entitlement: &GuildEntitlement, now: DateTime<Utc>) -> Self {
        Self {
            guild_id: entitlement.guild_id,
            premium_active: entitlement.is_active(now),
            premium_expires_at: entitlement.premium_expires_at,
            days_remaining: entitlement.days_remaining(now),
            premium_role_id: entitlement.premium_role_id,
            redeemed_codes_count: entitlement.redeemed_count(),
        }
    }
}

/// Outcome of a successful redemption
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionResponse {
    pub guild_id: Snowflake,
    pub code: String,
    pub premium_days: i32,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub premium_role_id: Option<Snowflake>,
    pub redeemed_codes_count: usize,
    pub code_uses: i32,
    pub code_max_uses: i32,
}

impl From<RedemptionReceipt> for RedemptionResponse {
    fn from(receipt: RedemptionReceipt) -> Self {
        Self {
            premium_expires_at: receipt.expires_at(),
            guild_id: receipt.entitlement.guild_id,
            premium_role_id: receipt.entitlement.premium_role_id,
            redeemed_codes_count: receipt.entitlement.redeemed_count(),
            premium_days: receipt.code.premium_days,
            code_uses: receipt.code.current_uses,
            code_max_uses: receipt.code.max_uses,
            code: receipt.code.code.into_inner(),
        }
    }
}

// ============================================================================
// Votes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecordResponse {
    pub user_id: Snowflake,
    pub username: Option<String>,
    pub total_votes: i64,
    pub last_vote_at: DateTime<Utc>,
    pub voted_at: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<VoteRecord> for VoteRecordResponse {
    fn from(record: VoteRecord) -> Self {
        Self {
            user_id: record.user_id,
            username: record.username,
            total_votes: record.total_votes,
            last_vote_at: record.last_vote_at,
            voted_at: record.voted_at,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub user_id: Snowflake,
    pub username: Option<String>,
    pub total_votes: i64,
    pub last_vote_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterInfoResponse {
    pub user_id: Snowflake,
    pub username: Option<String>,
    pub total_votes: i64,
    pub last_vote_at: DateTime<Utc>,
    /// Newest first
    pub recent_votes: Vec<DateTime<Utc>>,
    /// Arrival order
    pub vote_history: Vec<DateTime<Utc>>,
}

impl From<VoteRecord> for VoterInfoResponse {
    fn from(record: VoteRecord) -> Self {
        Self {
            recent_votes: record.recent_votes(RECENT_VOTES),
            user_id: record.user_id,
            username: record.username,
            total_votes: record.total_votes,
            last_vote_at: record.last_vote_at,
            vote_history: record.voted_at,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(now: DateTime<Utc>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: now,
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: LedgerChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerChecks {
    pub ledger: String,
}

impl ReadinessResponse {
    pub fn ready(ledger_healthy: bool, now: DateTime<Utc>) -> Self {
        Self {
            status: if ledger_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: now,
            checks: LedgerChecks {
                ledger: if ledger_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
