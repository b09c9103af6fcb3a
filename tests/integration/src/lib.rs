//! Integration test utilities for the premium ledger
//!
//! Runs the full HTTP stack against the in-memory ledger, a stub member
//! directory, and a manually driven clock.

pub mod directory;
pub mod fixtures;
pub mod helpers;

pub use directory::*;
pub use fixtures::*;
pub use helpers::*;
