//! Operator command handlers
//!
//! Every route here requires `x-admin-key`.

use axum::extract::{Path, State};
use premium_service::dto::{
    CodeBatchResponse, CodeResponse, GenerateCodesRequest, RedeemRequest, RedemptionResponse,
};
use premium_service::{ExpiryReconciler, RedemptionService, SweepReport};
use serde::Serialize;

use crate::extractors::{parse_snowflake, AdminActor, ValidatedJson};
use crate::response::{ApiResult, Created, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActiveCodes {
    pub count: usize,
    pub codes: Vec<CodeResponse>,
}

#[derive(Debug, Serialize)]
pub struct CodeEnvelope {
    pub code: CodeResponse,
}

#[derive(Debug, Serialize)]
pub struct SweepEnvelope {
    pub report: SweepReport,
}

/// Generate a batch of codes
///
/// POST /api/admin/codes
pub async fn generate_codes(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    ValidatedJson(request): ValidatedJson<GenerateCodesRequest>,
) -> ApiResult<Created<Success<CodeBatchResponse>>> {
    let batch = RedemptionService::new(state.service_context())
        .generate_codes(&actor, request)
        .await?;
    Ok(Created(Success::new(batch)))
}

/// Active codes, oldest first
///
/// GET /api/admin/codes/active
pub async fn list_active_codes(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
) -> ApiResult<Success<ActiveCodes>> {
    let codes = RedemptionService::new(state.service_context())
        .list_active_codes(&actor)
        .await?;

    Ok(Success::new(ActiveCodes {
        count: codes.len(),
        codes,
    }))
}

/// Deactivate a code
///
/// POST /api/admin/codes/{code}/deactivate
pub async fn deactivate_code(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
    Path(code): Path<String>,
) -> ApiResult<Success<CodeEnvelope>> {
    let code = RedemptionService::new(state.service_context())
        .deactivate_code(&actor, &code)
        .await?;
    Ok(Success::new(CodeEnvelope { code }))
}

/// Redeem a code on behalf of a guild
///
/// POST /api/admin/guilds/{guild_id}/redeem
pub async fn redeem_code(
    State(state): State<AppState>,
    AdminActor(_actor): AdminActor,
    Path(guild_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RedeemRequest>,
) -> ApiResult<Success<RedemptionResponse>> {
    let guild_id = parse_snowflake(&guild_id, "guild_id")?;

    let result = RedemptionService::new(state.service_context())
        .redeem(guild_id, &request.code, request.role_id)
        .await?;
    Ok(Success::new(result))
}

/// Run one expiry sweep now
///
/// POST /api/admin/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
    AdminActor(_actor): AdminActor,
) -> ApiResult<Success<SweepEnvelope>> {
    let report = ExpiryReconciler::new(state.service_context().clone())
        .sweep()
        .await?;
    Ok(Success::new(SweepEnvelope { report }))
}
