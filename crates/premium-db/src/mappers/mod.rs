//! Entity <-> model mappers
//!
//! Rows are validated on the way out: a stored value that no longer satisfies
//! a domain invariant surfaces as `DomainError::InternalError`, never a panic.

mod code;
mod entitlement;
mod vote;

use premium_core::{DomainError, RedemptionCode};

pub(crate) fn stored_code(raw: &str) -> Result<RedemptionCode, DomainError> {
    RedemptionCode::parse(raw)
        .map_err(|e| DomainError::InternalError(format!("corrupt code '{raw}' in ledger: {e}")))
}
