//! Vote webhook handler

use axum::extract::State;
use premium_service::dto::VoteWebhookPayload;
use premium_service::VoteService;
use serde::Serialize;
use tracing::debug;

use crate::extractors::{JsonBody, WebhookAuth};
use crate::response::{ApiResult, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VoteAccepted {
    pub message: &'static str,
}

/// Record a vote pushed by the voting site
///
/// POST /webhook/vote (alias POST /topgg/webhook)
pub async fn receive_vote(
    State(state): State<AppState>,
    _auth: WebhookAuth,
    JsonBody(payload): JsonBody<VoteWebhookPayload>,
) -> ApiResult<Success<VoteAccepted>> {
    debug!(
        user_id = %payload.user,
        bot_id = ?payload.bot,
        kind = ?payload.kind,
        "Vote webhook received"
    );

    VoteService::new(state.service_context())
        .ingest_vote(payload.user, payload.username, payload.kind.as_deref())
        .await?;

    Ok(Success::new(VoteAccepted {
        message: "Vote processed",
    }))
}
