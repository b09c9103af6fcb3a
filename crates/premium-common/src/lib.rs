//! # premium-common
//!
//! Shared utilities including configuration, error handling, shared-secret
//! authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::SharedSecret;
pub use config::{
    AdminConfig, AppConfig, AppSettings, CodeDefaults, ConfigError, CorsConfig, DatabaseConfig,
    DiscordConfig, Environment, LedgerBackend, LedgerConfig, RateLimitConfig, ReconcilerConfig,
    ServerConfig, WebhookConfig,
};
pub use error::{domain_status, AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
