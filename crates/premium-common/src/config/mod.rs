//! Configuration structs

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AppSettings, CodeDefaults, ConfigError, CorsConfig, DatabaseConfig,
    DiscordConfig, Environment, LedgerBackend, LedgerConfig, RateLimitConfig, ReconcilerConfig,
    ServerConfig, WebhookConfig,
};
