//! Test helpers for integration tests
//!
//! Provides a test server bound to an ephemeral port and thin request
//! wrappers that attach the webhook secret or admin key.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use premium_api::{create_app, AppState};
use premium_common::{
    AdminConfig, AppConfig, AppSettings, CodeDefaults, CorsConfig, DiscordConfig, Environment,
    LedgerBackend, LedgerConfig, RateLimitConfig, ReconcilerConfig, ServerConfig, SharedSecret,
    WebhookConfig,
};
use premium_core::ManualClock;
use premium_db::MemoryLedger;
use premium_service::{ServiceContextBuilder, ServiceSettings};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::directory::StubDirectory;
use crate::fixtures::{ADMIN_KEY, WEBHOOK_SECRET};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub clock: Arc<ManualClock>,
    pub directory: Arc<StubDirectory>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let directory = Arc::new(StubDirectory::default());

        let ctx = ServiceContextBuilder::new()
            .ledger(Arc::new(MemoryLedger::new()))
            .directory(directory.clone())
            .clock(clock.clone())
            .settings(ServiceSettings::from_config(&config))
            .build()
            .map_err(|e| anyhow::anyhow!("service context: {e}"))?;

        let app = create_app(AppState::new(ctx, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            clock,
            directory,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with the admin key
    pub async fn get_admin(&self, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header("x-admin-key", ADMIN_KEY)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with the admin key
    pub async fn post_admin<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("x-admin-key", ADMIN_KEY)
            .json(body)
            .send()
            .await?)
    }

    /// Deliver a vote webhook with the given Authorization value
    pub async fn post_webhook<T: Serialize>(
        &self,
        path: &str,
        authorization: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("Authorization", authorization)
            .json(body)
            .send()
            .await?)
    }

    /// Deliver a vote with the configured secret, expecting success
    pub async fn vote<T: Serialize>(&self, body: &T) -> Result<()> {
        let response = self.post_webhook("/webhook/vote", WEBHOOK_SECRET, body).await?;
        assert_status(response, StatusCode::OK).await
    }
}

/// Configuration for an in-memory server; the directory is stubbed so the
/// Discord settings are never dialed.
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "premium-ledger-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        ledger: LedgerConfig {
            backend: LedgerBackend::Memory,
            ..LedgerConfig::default()
        },
        database: None,
        webhook: WebhookConfig {
            secret: SharedSecret::new(WEBHOOK_SECRET),
        },
        admin: AdminConfig {
            api_key: SharedSecret::new(ADMIN_KEY),
            owner_ids: Vec::new(),
        },
        discord: DiscordConfig {
            bot_token: SharedSecret::new("unused"),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        },
        reconciler: ReconcilerConfig::default(),
        codes: CodeDefaults::default(),
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig::default(),
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error envelope with the given status and error code
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    anyhow::ensure!(body["success"] == false, "expected success=false, got {body}");
    anyhow::ensure!(
        body["error"] == expected_code,
        "expected error {expected_code}, got {body}"
    );
    Ok(())
}
