//! Axum extractors for request handling
//!
//! Custom extractors for shared-secret authentication, path parameters,
//! and JSON bodies.

mod auth;
mod path;
mod validated;

pub use auth::{AdminActor, WebhookAuth, ADMIN_KEY_HEADER};
pub use path::{leaderboard_limit, parse_snowflake, DEFAULT_LEADERBOARD_LIMIT};
pub use validated::{JsonBody, ValidatedJson};
