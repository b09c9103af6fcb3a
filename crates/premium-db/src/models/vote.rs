//! Vote record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for vote_records table
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub user_id: i64,
    pub username: Option<String>,
    pub total_votes: i64,
    pub last_vote_at: DateTime<Utc>,
    pub voted_at: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
