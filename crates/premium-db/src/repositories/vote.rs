//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use premium_core::{RepoResult, Snowflake, VoteRecord, VoteRepository};

use crate::models::VoteModel;

use super::error::map_db_error;

const VOTE_COLUMNS: &str = "user_id, username, total_votes, last_vote_at, voted_at, created_at";

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new PgVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<VoteRecord>> {
        let result = sqlx::query_as::<_, VoteModel>(&format!(
            "SELECT {VOTE_COLUMNS} FROM vote_records WHERE user_id = $1"
        ))
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(VoteRecord::from))
    }

    #[instrument(skip(self))]
    async fn list_ranked(&self) -> RepoResult<Vec<VoteRecord>> {
        let results = sqlx::query_as::<_, VoteModel>(&format!(
            "SELECT {VOTE_COLUMNS} FROM vote_records ORDER BY total_votes DESC, seq ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(VoteRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: usize) -> RepoResult<Vec<VoteRecord>> {
        let results = sqlx::query_as::<_, VoteModel>(&format!(
            "SELECT {VOTE_COLUMNS} FROM vote_records ORDER BY total_votes DESC, seq ASC LIMIT $1"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(VoteRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn record_vote(
        &self,
        user_id: Snowflake,
        username: Option<&str>,
        at: DateTime<Utc>,
    ) -> RepoResult<VoteRecord> {
        let result = sqlx::query_as::<_, VoteModel>(&format!(
            r#"
            INSERT INTO vote_records (user_id, username, total_votes, last_vote_at,
                                      voted_at, created_at)
            VALUES ($1, $2, 1, $3, ARRAY[$3::TIMESTAMPTZ], $3)
            ON CONFLICT (user_id) DO UPDATE
            SET total_votes = vote_records.total_votes + 1,
                last_vote_at = GREATEST(vote_records.last_vote_at, EXCLUDED.last_vote_at),
                voted_at = array_append(vote_records.voted_at, EXCLUDED.last_vote_at),
                username = COALESCE(EXCLUDED.username, vote_records.username)
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(user_id.into_inner())
        .bind(username)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(VoteRecord::from(result))
    }
}
