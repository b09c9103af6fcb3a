//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in premium-core.

mod code;
mod entitlement;
mod error;
mod health;
mod vote;

pub use code::PgCodeRepository;
pub use entitlement::PgEntitlementRepository;
pub use health::PgLedgerHealth;
pub use vote::PgVoteRepository;
