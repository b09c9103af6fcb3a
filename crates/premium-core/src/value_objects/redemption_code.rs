//! Redemption code - canonical, uppercase code identifier

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A validated redemption code in canonical form.
///
/// User input is trimmed and uppercased, so `abcd-1234` and ` ABCD-1234 `
/// name the same code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedemptionCode(String);

impl RedemptionCode {
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 64;

    /// Normalize and validate user-supplied input.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.len() < Self::MIN_LEN || normalized.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidCode(format!(
                "code must be {}-{} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::InvalidCode(
                "code may only contain letters, digits and '-'".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RedemptionCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RedemptionCode> for String {
    fn from(code: RedemptionCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RedemptionCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for RedemptionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
