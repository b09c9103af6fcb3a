//! Code query handlers

use axum::extract::{Path, State};
use premium_service::dto::{CodeResponse, PublicCodeResponse};
use premium_service::EntitlementQueryService;
use serde::Serialize;

use crate::extractors::AdminActor;
use crate::response::{ApiResult, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CodeList {
    pub count: usize,
    pub codes: Vec<CodeResponse>,
}

/// Full code inventory
///
/// GET /api/codes (requires `x-admin-key`)
pub async fn list_codes(
    State(state): State<AppState>,
    AdminActor(actor): AdminActor,
) -> ApiResult<Success<CodeList>> {
    let codes = EntitlementQueryService::new(state.service_context())
        .list_codes(&actor)
        .await?;

    Ok(Success::new(CodeList {
        count: codes.len(),
        codes,
    }))
}

/// Public view of one code
///
/// GET /api/codes/{code}
pub async fn get_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Success<PublicCodeResponse>> {
    let code = EntitlementQueryService::new(state.service_context())
        .get_code(&code)
        .await?;
    Ok(Success::new(code))
}
