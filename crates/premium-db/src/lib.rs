//! # premium-db
//!
//! Ledger store implementing the repository traits of `premium-core`.
//!
//! ## Overview
//!
//! - Connection pool management with a bounded statement timeout
//! - Schema migrations (`migrations/`)
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - PostgreSQL repositories whose mutations are single conditional statements
//!   or one short transaction
//! - `MemoryLedger`, an in-process implementation of the same traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use premium_db::{create_pool, run_migrations, PgEntitlementRepository};
//!
//! async fn example(config: &premium_common::DatabaseConfig) -> anyhow::Result<()> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let entitlements = PgEntitlementRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryLedger;
pub use pool::{connect_options, create_pool, run_migrations, PgPool, MIGRATIONS_DIR};
pub use repositories::{
    PgCodeRepository, PgEntitlementRepository, PgLedgerHealth, PgVoteRepository,
};
