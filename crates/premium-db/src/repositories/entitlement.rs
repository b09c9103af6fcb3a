//! PostgreSQL implementation of EntitlementRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use premium_core::{
    Code, DomainError, EntitlementRepository, GuildEntitlement, RedemptionGrant,
    RedemptionReceipt, RepoResult, Snowflake,
};

use crate::models::{CodeModel, EntitlementModel};

use super::code::CODE_COLUMNS;
use super::error::map_db_error;

const ENTITLEMENT_COLUMNS: &str =
    "guild_id, premium_role_id, premium_expires_at, redeemed_codes, created_at, updated_at";

/// PostgreSQL implementation of EntitlementRepository
#[derive(Clone)]
pub struct PgEntitlementRepository {
    pool: PgPool,
}

impl PgEntitlementRepository {
    /// Create a new PgEntitlementRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        predicate: &str,
        order: &str,
        binds: &[DateTime<Utc>],
    ) -> RepoResult<Vec<GuildEntitlement>> {
        let sql = format!(
            "SELECT {ENTITLEMENT_COLUMNS} FROM guild_entitlements WHERE {predicate} ORDER BY {order}"
        );
        let mut query = sqlx::query_as::<_, EntitlementModel>(&sql);
        for at in binds {
            query = query.bind(*at);
        }

        let results = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        results.into_iter().map(GuildEntitlement::try_from).collect()
    }

    /// Explain why the conditional code update matched no row.
    ///
    /// Runs outside the aborted transaction; precedence is
    /// not found, then inactive, then exhausted.
    async fn classify_code_rejection(&self, grant: &RedemptionGrant) -> DomainError {
        let current = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM premium_codes WHERE code = $1"
        ))
        .bind(grant.code.as_str())
        .fetch_optional(&self.pool)
        .await;

        match current {
            Err(e) => map_db_error(e),
            Ok(None) => DomainError::CodeNotFound(grant.code.to_string()),
            Ok(Some(model)) => match Code::try_from(model) {
                Err(e) => e,
                Ok(code) => match code.ensure_redeemable() {
                    Err(e) => e,
                    // Became redeemable again after the failed attempt: report
                    // the conflict the attempt actually lost.
                    Ok(()) => DomainError::CodeExhausted(grant.code.to_string()),
                },
            },
        }
    }
}

#[async_trait]
impl EntitlementRepository for PgEntitlementRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildEntitlement>> {
        let result = sqlx::query_as::<_, EntitlementModel>(&format!(
            "SELECT {ENTITLEMENT_COLUMNS} FROM guild_entitlements WHERE guild_id = $1"
        ))
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GuildEntitlement::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_active(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        self.fetch_where("premium_expires_at > $1", "premium_expires_at ASC", &[now])
            .await
    }

    #[instrument(skip(self))]
    async fn list_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<GuildEntitlement>> {
        self.fetch_where("premium_expires_at < $1", "premium_expires_at ASC", &[now])
            .await
    }

    #[instrument(skip(self))]
    async fn list_expiring_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepoResult<Vec<GuildEntitlement>> {
        self.fetch_where(
            "premium_expires_at >= $1 AND premium_expires_at < $2",
            "premium_expires_at ASC",
            &[from, until],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_if_expired(
        &self,
        guild_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM guild_entitlements
            WHERE guild_id = $1 AND premium_expires_at < $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, grant), fields(guild_id = %grant.guild_id, code = %grant.code))]
    async fn apply_redemption(&self, grant: &RedemptionGrant) -> RepoResult<RedemptionReceipt> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock order is always code row, then guild row.
        let consumed = sqlx::query_as::<_, CodeModel>(&format!(
            r#"
            UPDATE premium_codes
            SET current_uses = current_uses + 1
            WHERE code = $1 AND is_active AND current_uses < max_uses
            RETURNING {CODE_COLUMNS}
            "#
        ))
        .bind(grant.code.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(consumed) = consumed else {
            tx.rollback().await.map_err(map_db_error)?;
            debug!("Conditional code update matched no row");
            return Err(self.classify_code_rejection(grant).await);
        };
        let code = Code::try_from(consumed)?;
        let expires_at = grant.redeemed_at + code.premium_duration();

        let updated = sqlx::query_as::<_, EntitlementModel>(&format!(
            r#"
            INSERT INTO guild_entitlements (guild_id, premium_role_id, premium_expires_at,
                                            redeemed_codes, created_at, updated_at)
            VALUES ($1, $2, $3, ARRAY[$4::TEXT], $5, $5)
            ON CONFLICT (guild_id) DO UPDATE
            SET premium_role_id = EXCLUDED.premium_role_id,
                premium_expires_at = EXCLUDED.premium_expires_at,
                redeemed_codes = array_append(guild_entitlements.redeemed_codes, $4::TEXT),
                updated_at = EXCLUDED.updated_at
            WHERE NOT ($4::TEXT = ANY(guild_entitlements.redeemed_codes))
            RETURNING {ENTITLEMENT_COLUMNS}
            "#
        ))
        .bind(grant.guild_id.into_inner())
        .bind(grant.role_id.into_inner())
        .bind(expires_at)
        .bind(grant.code.as_str())
        .bind(grant.redeemed_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(updated) = updated else {
            tx.rollback().await.map_err(map_db_error)?;
            return Err(DomainError::AlreadyRedeemedByGuild {
                guild_id: grant.guild_id,
                code: grant.code.to_string(),
            });
        };
        let entitlement = GuildEntitlement::try_from(updated)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(RedemptionReceipt { entitlement, code })
    }
}
