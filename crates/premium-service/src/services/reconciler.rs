//! Expiry reconciler
//!
//! Periodically revokes the premium role of guilds whose entitlement has
//! lapsed and deletes their records.

use std::time::Duration;

use premium_core::{GuildEntitlement, Snowflake};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Counters for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Expired records returned by the initial query
    pub examined: usize,
    /// Members whose premium role was removed
    pub revoked_members: usize,
    /// Guilds whose revocation failed or was incomplete
    pub revocation_failures: usize,
    pub deleted: usize,
    /// Records renewed by a redemption after the initial query
    pub skipped_renewed: usize,
    /// Per-guild ledger failures
    pub store_failures: usize,
}

/// Expiry reconciler
///
/// Owns a context clone so it can run on a background task.
#[derive(Debug, Clone)]
pub struct ExpiryReconciler {
    ctx: ServiceContext,
}

impl ExpiryReconciler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run one sweep over every expired entitlement.
    ///
    /// Failures for one guild never abort the sweep. A record is deleted
    /// whatever the revocation outcome, but only if it is still expired at
    /// delete time.
    ///
    /// Revocation is fire-and-forget: a redemption that lands after the
    /// role was removed keeps its renewed record, but its members stay
    /// without the role until it is granted again. Such guilds are logged
    /// at `warn` and counted as `skipped_renewed`.
    ///
    /// # Errors
    /// Fails only when the initial expired-record query fails.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> ServiceResult<SweepReport> {
        let now = self.ctx.clock().now();
        let expired = self.ctx.entitlement_repo().list_expired(now).await?;

        let mut report = SweepReport {
            examined: expired.len(),
            ..SweepReport::default()
        };

        for entitlement in expired {
            self.reconcile_guild(entitlement.guild_id, &mut report).await;
        }

        self.log_expiring_soon().await;

        info!(
            examined = report.examined,
            revoked_members = report.revoked_members,
            revocation_failures = report.revocation_failures,
            deleted = report.deleted,
            skipped_renewed = report.skipped_renewed,
            store_failures = report.store_failures,
            "Expiry sweep finished"
        );

        Ok(report)
    }

    async fn reconcile_guild(&self, guild_id: Snowflake, report: &mut SweepReport) {
        let now = self.ctx.clock().now();

        let current = match self.ctx.entitlement_repo().find(guild_id).await {
            Ok(Some(current)) => current,
            // Removed since the initial query
            Ok(None) => return,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to re-read entitlement");
                report.store_failures += 1;
                return;
            }
        };

        if !current.is_expired(now) {
            report.skipped_renewed += 1;
            return;
        }

        self.revoke(&current, report).await;

        match self
            .ctx
            .entitlement_repo()
            .delete_if_expired(guild_id, now)
            .await
        {
            Ok(true) => report.deleted += 1,
            Ok(false) => {
                warn!(
                    guild_id = %guild_id,
                    role_id = ?current.premium_role_id,
                    "Entitlement renewed during sweep after its role was revoked; role must be re-granted"
                );
                report.skipped_renewed += 1;
            }
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to delete expired entitlement");
                report.store_failures += 1;
            }
        }
    }

    async fn revoke(&self, entitlement: &GuildEntitlement, report: &mut SweepReport) {
        let Some(role_id) = entitlement.premium_role_id else {
            return;
        };
        let guild_id = entitlement.guild_id;

        match self.ctx.directory().revoke_role(guild_id, role_id).await {
            Ok(revocation) => {
                report.revoked_members += revocation.members_revoked;
                if !revocation.is_clean() {
                    report.revocation_failures += 1;
                }
                info!(
                    guild_id = %guild_id,
                    role_id = %role_id,
                    members_revoked = revocation.members_revoked,
                    members_failed = revocation.members_failed,
                    "Premium role revoked"
                );
            }
            Err(e) => {
                warn!(
                    guild_id = %guild_id,
                    role_id = %role_id,
                    error = %e,
                    "Failed to revoke premium role"
                );
                report.revocation_failures += 1;
            }
        }
    }

    async fn log_expiring_soon(&self) {
        let now = self.ctx.clock().now();
        let until = now + self.ctx.settings().warning_window;

        match self
            .ctx
            .entitlement_repo()
            .list_expiring_between(now, until)
            .await
        {
            Ok(soon) if soon.is_empty() => {}
            Ok(soon) => {
                let guilds: Vec<String> = soon.iter().map(|e| e.guild_id.to_string()).collect();
                info!(count = soon.len(), guilds = ?guilds, "Entitlements expiring soon");
            }
            Err(e) => warn!(error = %e, "Failed to list entitlements expiring soon"),
        }
    }

    /// Sweep now and then every `interval` until the handle is aborted
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        let period = interval.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep().await {
                    error!(error = %e, "Expiry sweep failed");
                }
            }
        })
    }
}
