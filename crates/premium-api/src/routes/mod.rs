//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, codes, health, premium, votes, webhook};
use crate::state::AppState;

/// Rate-limited routes: webhook, public queries, and operator commands
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(webhook_routes())
        .nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Vote webhook, under its current and legacy paths
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook/vote", post(webhook::receive_vote))
        .route("/topgg/webhook", post(webhook::receive_vote))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(premium_routes())
        .merge(vote_routes())
        .merge(code_routes())
        .nest("/admin", admin_routes())
}

fn premium_routes() -> Router<AppState> {
    Router::new()
        .route("/premium/servers", get(premium::list_premium_servers))
        .route("/premium/server/:guild_id", get(premium::get_premium_server))
}

fn vote_routes() -> Router<AppState> {
    Router::new()
        .route("/votes", get(votes::list_votes))
        .route("/votes/top/:limit", get(votes::top_voters))
        .route("/votes/user/:user_id", get(votes::get_voter))
}

fn code_routes() -> Router<AppState> {
    Router::new()
        .route("/codes", get(codes::list_codes))
        .route("/codes/:code", get(codes::get_code))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/codes", post(admin::generate_codes))
        .route("/codes/active", get(admin::list_active_codes))
        .route("/codes/:code/deactivate", post(admin::deactivate_code))
        .route("/guilds/:guild_id/redeem", post(admin::redeem_code))
        .route("/reconcile", post(admin::reconcile))
}
