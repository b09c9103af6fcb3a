//! Vote record entity - a user's vote history

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Vote record entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub user_id: Snowflake,
    pub username: Option<String>,
    pub total_votes: i64,
    pub last_vote_at: DateTime<Utc>,
    /// Arrival order, oldest first
    pub voted_at: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VoteRecord {
    /// Record for a user's first vote
    pub fn first(user_id: Snowflake, username: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            username,
            total_votes: 1,
            last_vote_at: at,
            voted_at: vec![at],
            created_at: at,
        }
    }

    /// Register another vote; a supplied username replaces the stored one
    pub fn record(&mut self, username: Option<String>, at: DateTime<Utc>) {
        self.total_votes += 1;
        self.last_vote_at = self.last_vote_at.max(at);
        self.voted_at.push(at);
        if username.is_some() {
            self.username = username;
        }
    }

    /// The most recent `n` votes, newest first
    pub fn recent_votes(&self, n: usize) -> Vec<DateTime<Utc>> {
        self.voted_at.iter().rev().take(n).copied().collect()
    }
}
