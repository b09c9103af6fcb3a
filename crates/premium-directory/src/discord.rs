//! Discord REST implementation of `MemberDirectory`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use premium_common::DiscordConfig;
use premium_core::{DirectoryError, MemberDirectory, RevocationReport, Snowflake};

use crate::payloads::{MemberPayload, RolePayload, UserPayload};

/// Largest page `GET /guilds/{id}/members` allows
pub const MEMBER_PAGE_SIZE: usize = 1000;

/// Audit log entry attached to each role removal
pub const EXPIRY_AUDIT_REASON: &str = "Premium subscription expired";

/// Membership directory over the Discord REST API
#[derive(Clone)]
pub struct DiscordDirectory {
    http: Client,
    api_base: String,
}

impl DiscordDirectory {
    pub fn new(config: &DiscordConfig) -> Result<Self, DirectoryError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bot {}", config.bot_token.expose()))
            .map_err(|_| DirectoryError::Request("bot token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("premium-ledger/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        guild_id: Option<Snowflake>,
    ) -> Result<Option<T>, DirectoryError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return match guild_id {
                Some(guild) => Err(DirectoryError::GuildUnavailable(guild)),
                None => Ok(None),
            };
        }

        let response = ensure_success(response)?;
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    /// Every member of the guild, paging by ascending user id
    async fn list_members(&self, guild_id: Snowflake) -> Result<Vec<MemberPayload>, DirectoryError> {
        let mut members = Vec::new();
        let mut after: Option<Snowflake> = None;

        loop {
            let path = match after {
                Some(last) => format!(
                    "/guilds/{guild_id}/members?limit={MEMBER_PAGE_SIZE}&after={last}"
                ),
                None => format!("/guilds/{guild_id}/members?limit={MEMBER_PAGE_SIZE}"),
            };
            let page: Vec<MemberPayload> = self
                .get_json(&path, Some(guild_id))
                .await?
                .unwrap_or_default();

            let page_len = page.len();
            after = page.last().map(|m| m.user.id);
            members.extend(page);

            if page_len < MEMBER_PAGE_SIZE {
                break;
            }
        }

        debug!(guild_id = %guild_id, members = members.len(), "Fetched guild members");
        Ok(members)
    }

    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), DirectoryError> {
        let response = self
            .http
            .delete(self.url(&format!(
                "/guilds/{guild_id}/members/{user_id}/roles/{role_id}"
            )))
            .header("X-Audit-Log-Reason", EXPIRY_AUDIT_REASON)
            .send()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        ensure_success(response).map(|_| ())
    }
}

fn ensure_success(response: Response) -> Result<Response, DirectoryError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(status_error(status, response.headers().get(RETRY_AFTER)))
    }
}

fn status_error(status: StatusCode, retry_after: Option<&HeaderValue>) -> DirectoryError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DirectoryError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_ms = retry_after
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .map_or(1000, |secs| (secs * 1000.0).ceil() as u64);
            DirectoryError::RateLimited { retry_after_ms }
        }
        other => DirectoryError::UnexpectedStatus {
            status: other.as_u16(),
        },
    }
}

#[async_trait]
impl MemberDirectory for DiscordDirectory {
    #[instrument(skip(self))]
    async fn role_exists(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<bool, DirectoryError> {
        let roles: Vec<RolePayload> = self
            .get_json(&format!("/guilds/{guild_id}/roles"), Some(guild_id))
            .await?
            .unwrap_or_default();

        Ok(roles.iter().any(|r| r.id == role_id))
    }

    #[instrument(skip(self))]
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<RevocationReport, DirectoryError> {
        let members = self.list_members(guild_id).await?;
        let mut report = RevocationReport::default();

        for member in members.iter().filter(|m| m.has_role(role_id)) {
            match self.remove_role(guild_id, member.user.id, role_id).await {
                Ok(()) => report.members_revoked += 1,
                Err(e) => {
                    warn!(
                        guild_id = %guild_id,
                        user_id = %member.user.id,
                        error = %e,
                        "Failed to remove premium role from member"
                    );
                    report.members_failed += 1;
                }
            }
        }

        Ok(report)
    }

    #[instrument(skip(self))]
    async fn username(&self, user_id: Snowflake) -> Result<Option<String>, DirectoryError> {
        let user: Option<UserPayload> = self.get_json(&format!("/users/{user_id}"), None).await?;
        Ok(user.map(|u| u.username))
    }
}
