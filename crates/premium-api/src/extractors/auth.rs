//! Shared-secret authentication extractors
//!
//! Both run on request parts, so a bad secret is rejected before the body
//! is read or any ledger access happens.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use premium_common::SharedSecret;
use premium_core::Actor;

use crate::response::ApiError;
use crate::state::AppState;

/// Header carrying the operator key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

fn check(headers: &HeaderMap, name: &str, secret: &SharedSecret) -> Result<(), ApiError> {
    let provided = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    if secret.matches(provided) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Vote webhook caller, authenticated by the raw `Authorization` header
#[derive(Debug, Clone, Copy)]
pub struct WebhookAuth;

#[async_trait]
impl<S> FromRequestParts<S> for WebhookAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        check(&parts.headers, AUTHORIZATION.as_str(), app_state.webhook_secret()).map_err(|e| {
            tracing::warn!("Unauthorized vote webhook attempt");
            e
        })?;

        Ok(WebhookAuth)
    }
}

/// Operator authenticated by `x-admin-key`
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        check(&parts.headers, ADMIN_KEY_HEADER, app_state.admin_key()).map_err(|e| {
            tracing::warn!(uri = %parts.uri, "Rejected admin request");
            e
        })?;

        Ok(AdminActor(Actor::AdminKey))
    }
}
