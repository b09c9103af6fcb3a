//! Error handling utilities for repositories

use premium_core::DomainError;
use sqlx::Error as SqlxError;

/// SQLSTATE codes that mean "try again later"
const TRANSIENT_SQLSTATES: &[&str] = &[
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available
    "57014", // query_canceled (statement_timeout)
    "57P01", // admin_shutdown
];

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    match &e {
        SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::WorkerCrashed => DomainError::StoreUnavailable(e.to_string()),
        SqlxError::Database(db_err)
            if db_err
                .code()
                .is_some_and(|code| TRANSIENT_SQLSTATES.iter().any(|s| *s == code)) =>
        {
            DomainError::StoreUnavailable(e.to_string())
        }
        _ => DomainError::InternalError(format!("ledger query failed: {e}")),
    }
}
