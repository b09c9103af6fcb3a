//! Vote ingestion

use premium_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::VoteRecordResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record one vote for `user_id`.
    ///
    /// The vote is stamped on arrival, before any directory lookup.
    /// Without a supplied username the directory is asked for the current
    /// one; a failed lookup keeps whatever was stored. Not retried: a retry
    /// after an ambiguous commit would count the vote twice.
    #[instrument(skip(self))]
    pub async fn ingest_vote(
        &self,
        user_id: Snowflake,
        username: Option<String>,
        kind: Option<&str>,
    ) -> ServiceResult<VoteRecordResponse> {
        let received_at = self.ctx.clock().now();

        let username = match username {
            Some(name) => Some(name),
            None => match self.ctx.directory().username(user_id).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Username lookup failed");
                    None
                }
            },
        };

        let record = self
            .ctx
            .vote_repo()
            .record_vote(user_id, username.as_deref(), received_at)
            .await?;

        info!(
            user_id = %user_id,
            kind = kind.unwrap_or("upvote"),
            total_votes = record.total_votes,
            "Vote recorded"
        );

        Ok(VoteRecordResponse::from(record))
    }
}
