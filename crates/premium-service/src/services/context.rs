//! Service context - dependency container for services
//!
//! Holds the ledger ports, the membership directory, the clock, and the
//! tunables every service reads.

use std::sync::Arc;
use std::time::Duration;

use premium_common::AppConfig;
use premium_core::{
    Actor, Clock, CodeGenerator, CodeRepository, EntitlementRepository, LedgerHealth,
    MemberDirectory, RandomCodeGenerator, Snowflake, SystemClock, VoteRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Tunables shared by all services
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Total attempts for a redemption hitting transient ledger failures
    pub retry_attempts: u32,
    /// Backoff unit; attempt `n` waits `n * retry_backoff`
    pub retry_backoff: Duration,
    /// Candidates tried per generated code before giving up
    pub generation_attempts: u32,
    pub default_quantity: u32,
    pub default_premium_days: i32,
    pub default_max_uses: i32,
    /// Users allowed to run privileged operations
    pub owner_ids: Vec<Snowflake>,
    /// How far ahead the reconciler reports upcoming expiries
    pub warning_window: chrono::Duration,
}

impl ServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            retry_attempts: config.ledger.retry_attempts,
            generation_attempts: config.codes.generation_attempts,
            default_quantity: config.codes.quantity,
            default_premium_days: config.codes.premium_days,
            default_max_uses: config.codes.max_uses,
            owner_ids: config.admin.owner_ids.clone(),
            warning_window: chrono::Duration::hours(config.reconciler.warning_window_hours),
            ..Self::default()
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(50),
            generation_attempts: 10,
            default_quantity: 15,
            default_premium_days: 31,
            default_max_uses: 1,
            owner_ids: Vec::new(),
            warning_window: chrono::Duration::hours(24),
        }
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Ledger ports
    code_repo: Arc<dyn CodeRepository>,
    entitlement_repo: Arc<dyn EntitlementRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    ledger_health: Arc<dyn LedgerHealth>,

    // Collaborators
    directory: Arc<dyn MemberDirectory>,
    clock: Arc<dyn Clock>,
    code_generator: Arc<dyn CodeGenerator>,

    settings: ServiceSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code_repo: Arc<dyn CodeRepository>,
        entitlement_repo: Arc<dyn EntitlementRepository>,
        vote_repo: Arc<dyn VoteRepository>,
        ledger_health: Arc<dyn LedgerHealth>,
        directory: Arc<dyn MemberDirectory>,
        clock: Arc<dyn Clock>,
        code_generator: Arc<dyn CodeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            code_repo,
            entitlement_repo,
            vote_repo,
            ledger_health,
            directory,
            clock,
            code_generator,
            settings,
        }
    }

    // === Ledger ===

    pub fn code_repo(&self) -> &dyn CodeRepository {
        self.code_repo.as_ref()
    }

    pub fn entitlement_repo(&self) -> &dyn EntitlementRepository {
        self.entitlement_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn ledger_health(&self) -> &dyn LedgerHealth {
        self.ledger_health.as_ref()
    }

    // === Collaborators ===

    pub fn directory(&self) -> &dyn MemberDirectory {
        self.directory.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn code_generator(&self) -> &dyn CodeGenerator {
        self.code_generator.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Whether `actor` may run privileged operations
    pub fn is_privileged(&self, actor: &Actor) -> bool {
        match actor {
            Actor::AdminKey => true,
            Actor::User(id) => self.settings.owner_ids.contains(id),
        }
    }

    /// Fail with `NotPrivileged` unless `actor` is an owner or the admin key
    pub fn require_privileged(&self, actor: &Actor) -> ServiceResult<()> {
        if self.is_privileged(actor) {
            Ok(())
        } else {
            Err(premium_core::DomainError::NotPrivileged.into())
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("directory", &"MemberDirectory")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    code_repo: Option<Arc<dyn CodeRepository>>,
    entitlement_repo: Option<Arc<dyn EntitlementRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    ledger_health: Option<Arc<dyn LedgerHealth>>,
    directory: Option<Arc<dyn MemberDirectory>>,
    clock: Option<Arc<dyn Clock>>,
    code_generator: Option<Arc<dyn CodeGenerator>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for every ledger port
    pub fn ledger<L>(self, ledger: Arc<L>) -> Self
    where
        L: CodeRepository + EntitlementRepository + VoteRepository + LedgerHealth + 'static,
    {
        self.code_repo(ledger.clone())
            .entitlement_repo(ledger.clone())
            .vote_repo(ledger.clone())
            .ledger_health(ledger)
    }

    pub fn code_repo(mut self, repo: Arc<dyn CodeRepository>) -> Self {
        self.code_repo = Some(repo);
        self
    }

    pub fn entitlement_repo(mut self, repo: Arc<dyn EntitlementRepository>) -> Self {
        self.entitlement_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn ledger_health(mut self, health: Arc<dyn LedgerHealth>) -> Self {
        self.ledger_health = Some(health);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn MemberDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Defaults to [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`RandomCodeGenerator`]
    pub fn code_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.code_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.code_repo
                .ok_or_else(|| ServiceError::validation("code_repo is required"))?,
            self.entitlement_repo
                .ok_or_else(|| ServiceError::validation("entitlement_repo is required"))?,
            self.vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            self.ledger_health
                .ok_or_else(|| ServiceError::validation("ledger_health is required"))?,
            self.directory
                .ok_or_else(|| ServiceError::validation("directory is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.code_generator
                .unwrap_or_else(|| Arc::new(RandomCodeGenerator)),
            self.settings.unwrap_or_default(),
        ))
    }
}
