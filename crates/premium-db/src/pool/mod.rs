//! Database connection pool management

mod postgres;

pub use postgres::{connect_options, create_pool, run_migrations, MIGRATIONS_DIR};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
