//! Code entity - a redeemable premium code

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::value_objects::{Actor, RedemptionCode};

/// Characters used for generated code bodies
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated code body (without prefix)
pub const GENERATED_CODE_LEN: usize = 16;

/// Code entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub code: RedemptionCode,
    pub premium_days: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Code {
    /// Create a new, unused, active code
    pub fn new(
        code: RedemptionCode,
        premium_days: i32,
        max_uses: i32,
        created_by: &Actor,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            premium_days,
            max_uses,
            current_uses: 0,
            is_active: true,
            created_by: created_by.label(),
            created_at,
        }
    }

    /// Check if code has reached max uses
    pub fn is_exhausted(&self) -> bool {
        self.current_uses >= self.max_uses
    }

    pub fn remaining_uses(&self) -> i32 {
        (self.max_uses - self.current_uses).max(0)
    }

    /// Duration granted by one redemption
    pub fn premium_duration(&self) -> Duration {
        Duration::days(i64::from(self.premium_days))
    }

    /// Inactive is reported before exhausted.
    pub fn ensure_redeemable(&self) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::CodeInactive(self.code.to_string()));
        }
        if self.is_exhausted() {
            return Err(DomainError::CodeExhausted(self.code.to_string()));
        }
        Ok(())
    }

    /// Record one use. Callers must have checked `ensure_redeemable`.
    pub fn consume_use(&mut self) {
        self.current_uses += 1;
    }
}

/// Generate a random code body from `CODE_ALPHABET`
pub fn generate_code_body() -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
