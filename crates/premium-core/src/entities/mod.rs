//! Domain entities - core business objects

mod code;
mod entitlement;
mod vote;

pub use code::{generate_code_body, Code, CODE_ALPHABET, GENERATED_CODE_LEN};
pub use entitlement::{GuildEntitlement, RedemptionGrant, RedemptionReceipt};
pub use vote::VoteRecord;
