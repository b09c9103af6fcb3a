//! Code entity <-> model mapper

use premium_core::{Code, DomainError};

use super::stored_code;
use crate::models::CodeModel;

/// Convert CodeModel to Code entity
impl TryFrom<CodeModel> for Code {
    type Error = DomainError;

    fn try_from(model: CodeModel) -> Result<Self, Self::Error> {
        Ok(Code {
            code: stored_code(&model.code)?,
            premium_days: model.premium_days,
            max_uses: model.max_uses,
            current_uses: model.current_uses,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
