//! Test fixtures and data generators

use std::sync::atomic::{AtomicI64, Ordering};

use premium_core::Snowflake;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const ADMIN_KEY: &str = "test-admin-key";

static COUNTER: AtomicI64 = AtomicI64::new(100_000_000_000_000_000);

/// A fresh snowflake for guilds, roles, and users
pub fn unique_snowflake() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Vote webhook body
pub fn vote_payload(user: Snowflake) -> Value {
    json!({ "user": user.to_string(), "type": "upvote" })
}

/// Batch generation request
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<i32>,
}

impl GenerateCodes {
    pub fn single(days: i32, max_uses: i32) -> Self {
        Self {
            quantity: Some(1),
            days: Some(days),
            prefix: None,
            max_uses: Some(max_uses),
        }
    }
}

/// Redemption request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redeem {
    pub code: String,
    pub role_id: String,
}

impl Redeem {
    pub fn new(code: &str, role_id: Snowflake) -> Self {
        Self {
            code: code.to_string(),
            role_id: role_id.to_string(),
        }
    }
}

/// Code as listed by admin endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeView {
    pub code: String,
    pub premium_days: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    pub remaining_uses: i32,
    pub is_active: bool,
    pub created_by: String,
}

/// Response of POST /api/admin/codes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBatch {
    pub success: bool,
    pub requested: u32,
    pub premium_days: i32,
    pub max_uses: i32,
    pub created: Vec<CodeView>,
    pub failures: Vec<Value>,
}

/// Guild entitlement view
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildStatus {
    pub guild_id: String,
    pub premium_active: bool,
    pub premium_expires_at: Option<String>,
    pub days_remaining: i64,
    pub premium_role_id: Option<String>,
    pub redeemed_codes_count: usize,
}

/// Response of a successful redemption
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub guild_id: String,
    pub code: String,
    pub premium_days: i32,
    pub premium_expires_at: Option<String>,
    pub redeemed_codes_count: usize,
    pub code_uses: i32,
    pub code_max_uses: i32,
}
