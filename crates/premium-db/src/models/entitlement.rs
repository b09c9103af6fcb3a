//! Guild entitlement database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for guild_entitlements table
#[derive(Debug, Clone, FromRow)]
pub struct EntitlementModel {
    pub guild_id: i64,
    pub premium_role_id: Option<i64>,
    pub premium_expires_at: Option<DateTime<Utc>>,
    pub redeemed_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
