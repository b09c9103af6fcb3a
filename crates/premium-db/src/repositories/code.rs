//! PostgreSQL implementation of CodeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use premium_core::{Code, CodeRepository, RedemptionCode, RepoResult};

use crate::models::CodeModel;

use super::error::map_db_error;

pub(crate) const CODE_COLUMNS: &str =
    "code, premium_days, max_uses, current_uses, is_active, created_by, created_at";

/// PostgreSQL implementation of CodeRepository
#[derive(Clone)]
pub struct PgCodeRepository {
    pool: PgPool,
}

impl PgCodeRepository {
    /// Create a new PgCodeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_codes(models: Vec<CodeModel>) -> RepoResult<Vec<Code>> {
    models.into_iter().map(Code::try_from).collect()
}

#[async_trait]
impl CodeRepository for PgCodeRepository {
    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &RedemptionCode) -> RepoResult<Option<Code>> {
        let result = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM premium_codes WHERE code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Code::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Code>> {
        let results = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM premium_codes ORDER BY created_at ASC, code ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_codes(results)
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<Code>> {
        let results = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM premium_codes WHERE is_active \
             ORDER BY created_at ASC, code ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_codes(results)
    }

    #[instrument(skip(self, code), fields(code = %code.code))]
    async fn insert_if_absent(&self, code: &Code) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO premium_codes (code, premium_days, max_uses, current_uses,
                                       is_active, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(code.code.as_str())
        .bind(code.premium_days)
        .bind(code.max_uses)
        .bind(code.current_uses)
        .bind(code.is_active)
        .bind(&code.created_by)
        .bind(code.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, code: &RedemptionCode) -> RepoResult<Option<Code>> {
        let result = sqlx::query_as::<_, CodeModel>(&format!(
            "UPDATE premium_codes SET is_active = FALSE WHERE code = $1 RETURNING {CODE_COLUMNS}"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Code::try_from).transpose()
    }
}
