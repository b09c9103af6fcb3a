//! PostgreSQL readiness probe

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use premium_core::{LedgerHealth, RepoResult};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgLedgerHealth {
    pool: PgPool,
}

impl PgLedgerHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerHealth for PgLedgerHealth {
    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
