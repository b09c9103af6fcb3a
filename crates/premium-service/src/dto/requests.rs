//! Request DTOs for API endpoints

use premium_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

/// Batch code generation; omitted fields take the configured defaults
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodesRequest {
    #[validate(range(min = 1, max = 100, message = "Quantity must be 1-100"))]
    pub quantity: Option<u32>,

    #[validate(range(min = 1, max = 3650, message = "Days must be 1-3650"))]
    pub days: Option<i32>,

    #[validate(length(min = 1, max = 16, message = "Prefix must be 1-16 characters"))]
    pub prefix: Option<String>,

    #[validate(range(min = 1, max = 1000, message = "Max uses must be 1-1000"))]
    pub max_uses: Option<i32>,
}

/// Redeem a code for a guild
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[validate(length(min = 1, max = 64, message = "Code must be 1-64 characters"))]
    pub code: String,

    #[serde(alias = "role_id")]
    pub role_id: Snowflake,
}

/// Vote webhook body as sent by the voting site
#[derive(Debug, Clone, Deserialize)]
pub struct VoteWebhookPayload {
    pub user: Snowflake,

    /// `upvote` or `test`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Bot that was voted for; logged with `kind`
    #[serde(default)]
    pub bot: Option<Snowflake>,
}
