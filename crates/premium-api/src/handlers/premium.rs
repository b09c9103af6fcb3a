//! Entitlement query handlers

use axum::extract::{Path, State};
use premium_service::dto::GuildStatusResponse;
use premium_service::EntitlementQueryService;
use serde::Serialize;

use crate::extractors::parse_snowflake;
use crate::response::{ApiResult, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServerList {
    pub count: usize,
    pub servers: Vec<GuildStatusResponse>,
}

/// Guilds with active premium
///
/// GET /api/premium/servers
pub async fn list_premium_servers(
    State(state): State<AppState>,
) -> ApiResult<Success<ServerList>> {
    let servers = EntitlementQueryService::new(state.service_context())
        .list_active_entitlements()
        .await?;

    Ok(Success::new(ServerList {
        count: servers.len(),
        servers,
    }))
}

/// One guild's premium status; 404 when the guild has no record
///
/// GET /api/premium/server/{guild_id}
pub async fn get_premium_server(
    State(state): State<AppState>,
    Path(guild_id): Path<String>,
) -> ApiResult<Success<GuildStatusResponse>> {
    let guild_id = parse_snowflake(&guild_id, "guild_id")?;

    let status = EntitlementQueryService::new(state.service_context())
        .require_guild_status(guild_id)
        .await?;
    Ok(Success::new(status))
}
