//! # premium-api
//!
//! HTTP surface of the premium ledger built with Axum: the vote webhook,
//! the public entitlement/vote/code queries, and the operator commands.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server, spawn_reconciler};
pub use state::AppState;
