//! Stub member directory

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use premium_core::{DirectoryError, MemberDirectory, RevocationReport, Snowflake};

/// Directory whose roles and usernames are set by the test
#[derive(Debug, Default)]
pub struct StubDirectory {
    roles: Mutex<HashSet<(Snowflake, Snowflake)>>,
    usernames: Mutex<HashMap<Snowflake, String>>,
    revocations: Mutex<Vec<(Snowflake, Snowflake)>>,
}

impl StubDirectory {
    /// Make `role_id` exist in `guild_id`
    pub fn add_role(&self, guild_id: Snowflake, role_id: Snowflake) {
        self.roles.lock().insert((guild_id, role_id));
    }

    pub fn set_username(&self, user_id: Snowflake, name: &str) {
        self.usernames.lock().insert(user_id, name.to_string());
    }

    /// Every `(guild, role)` pair revoked so far
    pub fn revocations(&self) -> Vec<(Snowflake, Snowflake)> {
        self.revocations.lock().clone()
    }
}

#[async_trait]
impl MemberDirectory for StubDirectory {
    async fn role_exists(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<bool, DirectoryError> {
        Ok(self.roles.lock().contains(&(guild_id, role_id)))
    }

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<RevocationReport, DirectoryError> {
        self.revocations.lock().push((guild_id, role_id));
        Ok(RevocationReport {
            members_revoked: 1,
            members_failed: 0,
        })
    }

    async fn username(&self, user_id: Snowflake) -> Result<Option<String>, DirectoryError> {
        Ok(self.usernames.lock().get(&user_id).cloned())
    }
}
