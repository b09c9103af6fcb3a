//! In-process ledger for tests and single-node development

mod ledger;

pub use ledger::MemoryLedger;
