//! Redemption service
//!
//! Code redemption and privileged code administration.

use premium_core::{
    Actor, Code, DomainError, RedemptionCode, RedemptionGrant, Snowflake,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    CodeBatchResponse, CodeGenerationFailure, CodeResponse, GenerateCodesRequest,
    RedemptionResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::retry::retry_transient;

/// Redemption service
pub struct RedemptionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RedemptionService<'a> {
    /// Create a new RedemptionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Redeem `code_input` for a guild, granting `role_id`.
    ///
    /// Rejections are checked in order: unknown code, inactive, exhausted,
    /// already redeemed by this guild, unknown role. The code use and the
    /// guild update are applied as one atomic unit by the ledger; a
    /// transient ledger failure restarts the whole redemption.
    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        guild_id: Snowflake,
        code_input: &str,
        role_id: Snowflake,
    ) -> ServiceResult<RedemptionResponse> {
        let code = RedemptionCode::parse(code_input)?;
        let settings = self.ctx.settings();
        let this = self;
        let code_ref = &code;

        retry_transient(
            settings.retry_attempts,
            settings.retry_backoff,
            "redeem",
            move || this.try_redeem(guild_id, code_ref, role_id),
        )
        .await
    }

    async fn try_redeem(
        &self,
        guild_id: Snowflake,
        code: &RedemptionCode,
        role_id: Snowflake,
    ) -> ServiceResult<RedemptionResponse> {
        let stored = self
            .ctx
            .code_repo()
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::CodeNotFound(code.to_string()))?;
        stored.ensure_redeemable()?;

        if let Some(entitlement) = self.ctx.entitlement_repo().find(guild_id).await? {
            if entitlement.has_redeemed(code) {
                return Err(DomainError::AlreadyRedeemedByGuild {
                    guild_id,
                    code: code.to_string(),
                }
                .into());
            }
        }

        let role_exists = self
            .ctx
            .directory()
            .role_exists(guild_id, role_id)
            .await
            .map_err(DomainError::from)?;
        if !role_exists {
            return Err(DomainError::RoleNotFound { guild_id, role_id }.into());
        }

        // The ledger re-checks every precondition atomically.
        let receipt = self
            .ctx
            .entitlement_repo()
            .apply_redemption(&RedemptionGrant {
                guild_id,
                code: code.clone(),
                role_id,
                redeemed_at: self.ctx.clock().now(),
            })
            .await?;

        info!(
            guild_id = %guild_id,
            code = %code,
            role_id = %role_id,
            premium_days = receipt.code.premium_days,
            expires_at = ?receipt.expires_at(),
            "Code redeemed"
        );

        Ok(RedemptionResponse::from(receipt))
    }

    /// Generate a batch of unique codes.
    ///
    /// A code that stays non-unique after the configured number of
    /// candidates, or whose insert fails, is reported as a failure while the
    /// rest of the batch proceeds.
    #[instrument(skip(self, request), fields(actor = %actor.label()))]
    pub async fn generate_codes(
        &self,
        actor: &Actor,
        request: GenerateCodesRequest,
    ) -> ServiceResult<CodeBatchResponse> {
        self.ctx.require_privileged(actor)?;
        request.validate()?;

        let settings = self.ctx.settings();
        let quantity = request.quantity.unwrap_or(settings.default_quantity);
        let premium_days = request.days.unwrap_or(settings.default_premium_days);
        let max_uses = request.max_uses.unwrap_or(settings.default_max_uses);
        let prefix = request.prefix.as_deref().map(str::trim);
        if let Some(prefix) = prefix {
            validate_prefix(prefix)?;
        }

        let mut created = Vec::new();
        let mut failures = Vec::new();

        for index in 0..quantity {
            match self
                .insert_unique(actor, prefix, premium_days, max_uses)
                .await
            {
                Ok(code) => created.push(CodeResponse::from(code)),
                Err(e) => {
                    warn!(index, error = %e, "Code generation failed");
                    failures.push(CodeGenerationFailure {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            created = created.len(),
            failed = failures.len(),
            premium_days,
            max_uses,
            "Codes generated"
        );

        Ok(CodeBatchResponse {
            requested: quantity,
            premium_days,
            max_uses,
            created,
            failures,
        })
    }

    async fn insert_unique(
        &self,
        actor: &Actor,
        prefix: Option<&str>,
        premium_days: i32,
        max_uses: i32,
    ) -> ServiceResult<Code> {
        let attempts = self.ctx.settings().generation_attempts.max(1);

        for _ in 0..attempts {
            let candidate = self.ctx.code_generator().generate(prefix)?;
            let code = Code::new(
                candidate,
                premium_days,
                max_uses,
                actor,
                self.ctx.clock().now(),
            );
            if self.ctx.code_repo().insert_if_absent(&code).await? {
                return Ok(code);
            }
        }

        Err(DomainError::CodeAlreadyExists(format!(
            "no unique code after {attempts} attempts"
        ))
        .into())
    }

    /// Deactivate a code. One-way; deactivating twice is a no-op.
    #[instrument(skip(self), fields(actor = %actor.label()))]
    pub async fn deactivate_code(
        &self,
        actor: &Actor,
        code_input: &str,
    ) -> ServiceResult<CodeResponse> {
        self.ctx.require_privileged(actor)?;
        let code = RedemptionCode::parse(code_input)?;

        let updated = self
            .ctx
            .code_repo()
            .deactivate(&code)
            .await?
            .ok_or_else(|| DomainError::CodeNotFound(code.to_string()))?;

        info!(code = %code, uses = updated.current_uses, "Code deactivated");
        Ok(CodeResponse::from(updated))
    }

    /// Active codes, oldest first
    #[instrument(skip(self), fields(actor = %actor.label()))]
    pub async fn list_active_codes(&self, actor: &Actor) -> ServiceResult<Vec<CodeResponse>> {
        self.ctx.require_privileged(actor)?;

        let codes = self.ctx.code_repo().list_active().await?;
        Ok(codes.into_iter().map(CodeResponse::from).collect())
    }
}

fn validate_prefix(prefix: &str) -> ServiceResult<()> {
    if prefix.is_empty() || prefix.len() > 16 || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ServiceError::validation(
            "Prefix must be 1-16 letters or digits",
        ));
    }
    Ok(())
}
