//! Entitlement query service
//!
//! Read-only views over entitlements, votes, and codes.

use premium_core::{Actor, DomainError, GuildEntitlement, RedemptionCode, Snowflake};
use tracing::{instrument, warn};

use crate::dto::{
    CodeResponse, GuildStatusResponse, LeaderboardEntry, PublicCodeResponse, ReadinessResponse,
    VoteRecordResponse, VoterInfoResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Largest leaderboard a caller may request
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Entitlement query service
pub struct EntitlementQueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EntitlementQueryService<'a> {
    /// Create a new EntitlementQueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Status of a guild; a guild with no record reports as inactive.
    /// Nothing is persisted.
    #[instrument(skip(self))]
    pub async fn guild_status(&self, guild_id: Snowflake) -> ServiceResult<GuildStatusResponse> {
        let now = self.ctx.clock().now();
        let entitlement = self
            .ctx
            .entitlement_repo()
            .find(guild_id)
            .await?
            .unwrap_or_else(|| GuildEntitlement::empty(guild_id, now));

        Ok(GuildStatusResponse::at(&entitlement, now))
    }

    /// Status of a guild that must have a record
    #[instrument(skip(self))]
    pub async fn require_guild_status(
        &self,
        guild_id: Snowflake,
    ) -> ServiceResult<GuildStatusResponse> {
        let entitlement = self
            .ctx
            .entitlement_repo()
            .find(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        Ok(GuildStatusResponse::at(&entitlement, self.ctx.clock().now()))
    }

    /// Guilds with premium currently active
    #[instrument(skip(self))]
    pub async fn list_active_entitlements(&self) -> ServiceResult<Vec<GuildStatusResponse>> {
        let now = self.ctx.clock().now();
        let active = self.ctx.entitlement_repo().list_active(now).await?;

        Ok(active
            .iter()
            .map(|e| GuildStatusResponse::at(e, now))
            .collect())
    }

    /// Top voters by total, ties in first-vote order.
    ///
    /// `limit` must be at least 1; larger values are capped.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self, limit: u32) -> ServiceResult<Vec<LeaderboardEntry>> {
        if limit == 0 {
            return Err(ServiceError::validation("Limit must be at least 1"));
        }
        let limit = limit.min(MAX_LEADERBOARD_LIMIT) as usize;

        let top = self.ctx.vote_repo().top(limit).await?;
        Ok(top
            .into_iter()
            .enumerate()
            .map(|(i, record)| LeaderboardEntry {
                rank: i + 1,
                user_id: record.user_id,
                username: record.username,
                total_votes: record.total_votes,
                last_vote_at: record.last_vote_at,
            })
            .collect())
    }

    /// Every vote record in leaderboard order
    #[instrument(skip(self))]
    pub async fn list_votes(&self) -> ServiceResult<Vec<VoteRecordResponse>> {
        let ranked = self.ctx.vote_repo().list_ranked().await?;
        Ok(ranked.into_iter().map(VoteRecordResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn voter_info(&self, user_id: Snowflake) -> ServiceResult<VoterInfoResponse> {
        let record = self
            .ctx
            .vote_repo()
            .find(user_id)
            .await?
            .ok_or(DomainError::VoterNotFound(user_id))?;

        Ok(VoterInfoResponse::from(record))
    }

    /// Every code, including creators; privileged
    #[instrument(skip(self), fields(actor = %actor.label()))]
    pub async fn list_codes(&self, actor: &Actor) -> ServiceResult<Vec<CodeResponse>> {
        self.ctx.require_privileged(actor)?;

        let codes = self.ctx.code_repo().list_all().await?;
        Ok(codes.into_iter().map(CodeResponse::from).collect())
    }

    /// Public view of one code
    #[instrument(skip(self))]
    pub async fn get_code(&self, code_input: &str) -> ServiceResult<PublicCodeResponse> {
        let code = RedemptionCode::parse(code_input)?;
        let found = self
            .ctx
            .code_repo()
            .find_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::CodeNotFound(code.to_string()))?;

        Ok(PublicCodeResponse::from(found))
    }

    /// Ledger readiness for health probes
    pub async fn readiness(&self) -> ReadinessResponse {
        let healthy = match self.ctx.ledger_health().ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Ledger health check failed");
                false
            }
        };

        ReadinessResponse::ready(healthy, self.ctx.clock().now())
    }
}
