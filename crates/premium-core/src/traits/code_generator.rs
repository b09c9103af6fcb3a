//! Code generator port

use crate::entities::generate_code_body;
use crate::error::DomainError;
use crate::value_objects::RedemptionCode;

pub trait CodeGenerator: Send + Sync {
    /// Produce a candidate code, `PREFIX-BODY` when a prefix is given.
    ///
    /// Candidates are not guaranteed unique; callers check against the ledger.
    fn generate(&self, prefix: Option<&str>) -> Result<RedemptionCode, DomainError>;
}

/// Random 16-character codes over `A-Z0-9`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, prefix: Option<&str>) -> Result<RedemptionCode, DomainError> {
        let body = generate_code_body();
        match prefix {
            Some(p) if !p.trim().is_empty() => {
                RedemptionCode::parse(&format!("{}-{body}", p.trim()))
            }
            _ => RedemptionCode::parse(&body),
        }
    }
}
