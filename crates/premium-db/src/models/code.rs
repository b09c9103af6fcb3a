//! Code database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for premium_codes table
#[derive(Debug, Clone, FromRow)]
pub struct CodeModel {
    pub code: String,
    pub premium_days: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

