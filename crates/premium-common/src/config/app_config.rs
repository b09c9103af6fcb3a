//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use premium_core::Snowflake;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::SharedSecret;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub ledger: LedgerConfig,
    pub database: Option<DatabaseConfig>,
    pub webhook: WebhookConfig,
    pub admin: AdminConfig,
    pub discord: DiscordConfig,
    pub reconciler: ReconcilerConfig,
    pub codes: CodeDefaults,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which ledger store backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown ledger backend '{other}'")),
        }
    }
}

/// Ledger behaviour
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
    /// Attempts for a redemption that hit a transient store error
    pub retry_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub statement_timeout_ms: u64,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

/// Inbound vote webhook
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub secret: SharedSecret,
}

/// Privileged access
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_key: SharedSecret,
    /// Users allowed to run administrative commands
    pub owner_ids: Vec<Snowflake>,
}

/// Discord REST API access for the membership directory
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: SharedSecret,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl DiscordConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Expiry reconciler scheduling
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub interval_secs: u64,
    /// Entitlements expiring within this window are reported by each sweep
    pub warning_window_hours: i64,
}

impl ReconcilerConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval_secs(),
            warning_window_hours: 24,
        }
    }
}

/// Defaults for code generation
#[derive(Debug, Clone)]
pub struct CodeDefaults {
    pub quantity: u32,
    pub premium_days: i32,
    pub max_uses: i32,
    /// Candidates tried per code before reporting it as failed
    pub generation_attempts: u32,
}

impl Default for CodeDefaults {
    fn default() -> Self {
        Self {
            quantity: 15,
            premium_days: 31,
            max_uses: 1,
            generation_attempts: default_generation_attempts(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "premium-ledger".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_sweep_interval_secs() -> u64 {
    6 * 60 * 60
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_generation_attempts() -> u32 {
    10
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Read an optional variable, rejecting values that do not parse
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        _ => Ok(default),
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_owner_ids(raw: &str) -> Result<Vec<Snowflake>, ConfigError> {
    parse_list(raw)
        .map(|id| {
            Snowflake::parse(id).map_err(|_| ConfigError::InvalidValue("OWNER_USER_IDS", id.to_string()))
        })
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend: LedgerBackend = env::var("LEDGER_BACKEND")
            .ok()
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("LEDGER_BACKEND", e))?
            .unwrap_or_default();

        let database = match backend {
            LedgerBackend::Postgres => Some(DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
                statement_timeout_ms: parse_var(
                    "DATABASE_STATEMENT_TIMEOUT_MS",
                    default_statement_timeout_ms(),
                )?,
                acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
                run_migrations: parse_var("DATABASE_RUN_MIGRATIONS", true)?,
            }),
            LedgerBackend::Memory => None,
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("PORT", default_port())?,
            },
            ledger: LedgerConfig {
                backend,
                retry_attempts: parse_var("LEDGER_RETRY_ATTEMPTS", default_retry_attempts())?,
            },
            database,
            webhook: WebhookConfig {
                secret: SharedSecret::new(required_var("VOTE_WEBHOOK_SECRET")?),
            },
            admin: AdminConfig {
                api_key: SharedSecret::new(required_var("ADMIN_API_KEY")?),
                owner_ids: parse_owner_ids(&env::var("OWNER_USER_IDS").unwrap_or_default())?,
            },
            discord: DiscordConfig {
                bot_token: SharedSecret::new(required_var("DISCORD_BOT_TOKEN")?),
                api_base: env::var("DISCORD_API_BASE")
                    .unwrap_or_else(|_| default_discord_api_base()),
                timeout_secs: parse_var("DISCORD_TIMEOUT_SECS", 10)?,
            },
            reconciler: ReconcilerConfig {
                interval_secs: parse_var(
                    "EXPIRY_SWEEP_INTERVAL_SECS",
                    default_sweep_interval_secs(),
                )?,
                warning_window_hours: parse_var("EXPIRY_WARNING_WINDOW_HOURS", 24)?,
            },
            codes: CodeDefaults {
                generation_attempts: parse_var(
                    "CODE_GENERATION_ATTEMPTS",
                    default_generation_attempts(),
                )?,
                ..CodeDefaults::default()
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second(),
                )?,
                burst: parse_var("RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| parse_list(&s).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
