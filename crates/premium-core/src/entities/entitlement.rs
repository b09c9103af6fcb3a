//! Guild entitlement entity - a guild's premium state

use chrono::{DateTime, Utc};

use super::Code;
use crate::error::DomainError;
use crate::value_objects::{RedemptionCode, Snowflake};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Guild entitlement entity
///
/// A guild without a stored record behaves exactly like `GuildEntitlement::empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEntitlement {
    pub guild_id: Snowflake,
    pub premium_role_id: Option<Snowflake>,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub redeemed_codes: Vec<RedemptionCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuildEntitlement {
    /// The implicit record of a guild that never redeemed anything
    pub fn empty(guild_id: Snowflake, now: DateTime<Utc>) -> Self {
        Self {
            guild_id,
            premium_role_id: None,
            premium_expires_at: None,
            redeemed_codes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Premium is active iff an expiry is set and lies in the future
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.premium_expires_at.is_some_and(|expires| expires > now)
    }

    /// Eligible for the expiry sweep
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.premium_expires_at.is_some_and(|expires| expires < now)
    }

    /// Whole days left, rounded up; 0 when inactive
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.premium_expires_at {
            Some(expires) if expires > now => {
                let millis = (expires - now).num_milliseconds();
                (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
            }
            _ => 0,
        }
    }

    pub fn has_redeemed(&self, code: &RedemptionCode) -> bool {
        self.redeemed_codes.contains(code)
    }

    pub fn redeemed_count(&self) -> usize {
        self.redeemed_codes.len()
    }

    /// Apply a redemption in memory.
    ///
    /// The expiry is reset to `at + premium_days`, never stacked on the
    /// previous expiry. The previous role is replaced without being revoked.
    pub fn apply_redemption(
        &mut self,
        code: &Code,
        role_id: Snowflake,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.has_redeemed(&code.code) {
            return Err(DomainError::AlreadyRedeemedByGuild {
                guild_id: self.guild_id,
                code: code.code.to_string(),
            });
        }

        self.premium_expires_at = Some(at + code.premium_duration());
        self.premium_role_id = Some(role_id);
        self.redeemed_codes.push(code.code.clone());
        self.updated_at = at;
        Ok(())
    }
}

/// Input of an atomic redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionGrant {
    pub guild_id: Snowflake,
    pub code: RedemptionCode,
    pub role_id: Snowflake,
    pub redeemed_at: DateTime<Utc>,
}

/// State of both records right after a successful redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionReceipt {
    pub entitlement: GuildEntitlement,
    pub code: Code,
}

impl RedemptionReceipt {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.entitlement.premium_expires_at
    }
}
