//! # premium-directory
//!
//! `MemberDirectory` implementation backed by the Discord REST API: role
//! lookup, paginated member listing with role removal, and username lookup.

mod discord;
mod payloads;

pub use discord::{DiscordDirectory, EXPIRY_AUDIT_REASON, MEMBER_PAGE_SIZE};
pub use payloads::{MemberPayload, RolePayload, UserPayload};
