//! Member directory port - the chat platform's view of guild membership

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::value_objects::Snowflake;

/// Outcome of revoking one role from every member of a guild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevocationReport {
    pub members_revoked: usize,
    pub members_failed: usize,
}

impl RevocationReport {
    pub fn is_clean(&self) -> bool {
        self.members_failed == 0
    }
}

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("guild {0} is not reachable")]
    GuildUnavailable(Snowflake),

    #[error("directory rejected credentials")]
    Unauthorized,

    #[error("rate limited, retry after {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("malformed response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Whether the role exists in the guild
    async fn role_exists(&self, guild_id: Snowflake, role_id: Snowflake)
        -> Result<bool, DirectoryError>;

    /// Remove the role from every member holding it.
    ///
    /// Per-member failures are counted in the report; `Err` means the guild
    /// as a whole could not be processed.
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<RevocationReport, DirectoryError>;

    /// The user's current display username
    async fn username(&self, user_id: Snowflake) -> Result<Option<String>, DirectoryError>;
}
