//! Database models with SQLx `FromRow` derives

mod code;
mod entitlement;
mod vote;

pub use code::CodeModel;
pub use entitlement::EntitlementModel;
pub use vote::VoteModel;
