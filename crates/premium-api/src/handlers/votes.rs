//! Vote query handlers

use axum::extract::{Path, State};
use premium_service::dto::{LeaderboardEntry, VoteRecordResponse, VoterInfoResponse};
use premium_service::EntitlementQueryService;
use serde::Serialize;

use crate::extractors::{leaderboard_limit, parse_snowflake};
use crate::response::{ApiResult, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VoteList {
    pub count: usize,
    pub votes: Vec<VoteRecordResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub count: usize,
    pub top_voters: Vec<LeaderboardEntry>,
}

/// Every vote record, most votes first
///
/// GET /api/votes
pub async fn list_votes(State(state): State<AppState>) -> ApiResult<Success<VoteList>> {
    let votes = EntitlementQueryService::new(state.service_context())
        .list_votes()
        .await?;

    Ok(Success::new(VoteList {
        count: votes.len(),
        votes,
    }))
}

/// Top voters
///
/// GET /api/votes/top/{limit}
pub async fn top_voters(
    State(state): State<AppState>,
    Path(limit): Path<String>,
) -> ApiResult<Success<Leaderboard>> {
    let top_voters = EntitlementQueryService::new(state.service_context())
        .leaderboard(leaderboard_limit(&limit))
        .await?;

    Ok(Success::new(Leaderboard {
        count: top_voters.len(),
        top_voters,
    }))
}

/// One voter's totals and history
///
/// GET /api/votes/user/{user_id}
pub async fn get_voter(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Success<VoterInfoResponse>> {
    let user_id = parse_snowflake(&user_id, "user_id")?;

    let info = EntitlementQueryService::new(state.service_context())
        .voter_info(user_id)
        .await?;
    Ok(Success::new(info))
}
