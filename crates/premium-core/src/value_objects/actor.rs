//! Actor - who is performing an administrative operation

use std::fmt;

use super::Snowflake;

/// The caller of a privileged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// A chat user, privileged only when listed as an owner
    User(Snowflake),
    /// A caller holding the admin API key
    AdminKey,
}

impl Actor {
    /// Label stored in `Code::created_by`
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn user_id(&self) -> Option<Snowflake> {
        match self {
            Self::User(id) => Some(*id),
            Self::AdminKey => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::AdminKey => f.write_str("admin-api"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_label() {
        assert_eq!(Actor::User(Snowflake::new(42)).label(), "42");
        assert_eq!(Actor::AdminKey.label(), "admin-api");
        assert_eq!(Actor::AdminKey.user_id(), None);
    }
}
