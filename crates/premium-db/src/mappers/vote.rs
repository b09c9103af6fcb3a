//! Vote record entity <-> model mapper

use premium_core::{Snowflake, VoteRecord};

use crate::models::VoteModel;

/// Convert VoteModel to VoteRecord entity
impl From<VoteModel> for VoteRecord {
    fn from(model: VoteModel) -> Self {
        VoteRecord {
            user_id: Snowflake::new(model.user_id),
            username: model.username,
            total_votes: model.total_votes,
            last_vote_at: model.last_vote_at,
            voted_at: model.voted_at,
            created_at: model.created_at,
        }
    }
}
