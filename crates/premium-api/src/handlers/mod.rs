//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod codes;
pub mod health;
pub mod premium;
pub mod votes;
pub mod webhook;
