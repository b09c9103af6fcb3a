//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::traits::DirectoryError;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Code not found: {0}")]
    CodeNotFound(String),

    #[error("Guild has no entitlement record: {0}")]
    GuildNotFound(Snowflake),

    #[error("Voter not found: {0}")]
    VoterNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("Role {role_id} does not exist in guild {guild_id}")]
    RoleNotFound {
        guild_id: Snowflake,
        role_id: Snowflake,
    },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Code is no longer active: {0}")]
    CodeInactive(String),

    #[error("Code has reached maximum uses: {0}")]
    CodeExhausted(String),

    #[error("Guild {guild_id} already redeemed code {code}")]
    AlreadyRedeemedByGuild { guild_id: Snowflake, code: String },

    #[error("Code already exists: {0}")]
    CodeAlreadyExists(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unauthorized")]
    NotPrivileged,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Ledger unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CodeNotFound(_) => "UNKNOWN_CODE",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::VoterNotFound(_) => "UNKNOWN_VOTER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidCode(_) => "INVALID_CODE",
            Self::RoleNotFound { .. } => "UNKNOWN_ROLE",

            // Conflict
            Self::CodeInactive(_) => "CODE_INACTIVE",
            Self::CodeExhausted(_) => "CODE_EXHAUSTED",
            Self::AlreadyRedeemedByGuild { .. } => "CODE_ALREADY_REDEEMED",
            Self::CodeAlreadyExists(_) => "CODE_EXISTS",

            // Authorization
            Self::Unauthorized | Self::NotPrivileged => "UNAUTHORIZED",

            // Infrastructure
            Self::StoreUnavailable(_) => "LEDGER_UNAVAILABLE",
            Self::Directory(_) => "DIRECTORY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CodeNotFound(_) | Self::GuildNotFound(_) | Self::VoterNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidCode(_) | Self::RoleNotFound { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NotPrivileged)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::CodeInactive(_)
                | Self::CodeExhausted(_)
                | Self::AlreadyRedeemedByGuild { .. }
                | Self::CodeAlreadyExists(_)
        )
    }

    /// Transient ledger failures are safe to retry from scratch
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Failure of an outbound collaborator (membership directory)
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::CodeNotFound("ABCD".to_string());
        assert_eq!(err.code(), "UNKNOWN_CODE");

        let err = DomainError::AlreadyRedeemedByGuild {
            guild_id: Snowflake::new(1),
            code: "ABCD".to_string(),
        };
        assert_eq!(err.code(), "CODE_ALREADY_REDEEMED");

        assert_eq!(DomainError::NotPrivileged.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_classification_is_exclusive() {
        let errors = vec![
            DomainError::CodeNotFound("A".to_string()),
            DomainError::InvalidCode("bad".to_string()),
            DomainError::CodeExhausted("A".to_string()),
            DomainError::Unauthorized,
            DomainError::StoreUnavailable("timeout".to_string()),
            DomainError::Directory(DirectoryError::Request("reset".to_string())),
        ];

        for err in errors {
            let classes = [
                err.is_not_found(),
                err.is_validation(),
                err.is_conflict(),
                err.is_authorization(),
                err.is_transient(),
                err.is_collaborator(),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{err:?}");
        }
    }

    #[test]
    fn test_auth_errors_do_not_leak_detail() {
        assert_eq!(DomainError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(DomainError::NotPrivileged.to_string(), "Unauthorized");
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::RoleNotFound {
            guild_id: Snowflake::new(10),
            role_id: Snowflake::new(20),
        };
        assert_eq!(err.to_string(), "Role 20 does not exist in guild 10");
    }
}
