//! Shared secret comparison for the vote webhook and the admin API key

use std::fmt;
use subtle::ConstantTimeEq;

/// A configured secret. Never printed, compared in constant time.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Byte-for-byte comparison with a caller-supplied value.
    ///
    /// An empty configured secret matches nothing.
    pub fn matches(&self, provided: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        bool::from(self.0.as_bytes().ct_eq(provided.as_bytes()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}
