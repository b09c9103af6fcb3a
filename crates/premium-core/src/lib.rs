//! # premium-core
//!
//! Domain layer for the premium entitlement ledger: codes, guild entitlements,
//! vote records, the error taxonomy, and the ports (repository, directory,
//! clock, code generator) the other crates implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    generate_code_body, Code, GuildEntitlement, RedemptionGrant, RedemptionReceipt, VoteRecord,
    CODE_ALPHABET, GENERATED_CODE_LEN,
};
pub use error::DomainError;
pub use traits::{
    Clock, CodeGenerator, CodeRepository, DirectoryError, EntitlementRepository, LedgerHealth,
    ManualClock, MemberDirectory, RandomCodeGenerator, RepoResult, RevocationReport, SystemClock,
    VoteRepository,
};
pub use value_objects::{Actor, RedemptionCode, Snowflake, SnowflakeParseError};
