use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clipvault_application::SearchUseCase;
use clipvault_core::config::RootConfig;
use clipvault_core::search::{ClipSearchBackend, QueryConstraint, SearchPolicy};
use clipvault_infrastructure::logging::{WorkerGuard, init_tracing};
use clipvault_infrastructure::{ClipvaultPaths, ConfigService, ProcessSearchBackend};

/// Composition root shared by every subcommand.
pub struct App {
    pub config: RootConfig,
    backend: Arc<dyn ClipSearchBackend>,
    // Flushes the file log on drop.
    _log_guard: Option<WorkerGuard>,
}

impl App {
    pub fn bootstrap(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_service = ConfigService::new(ClipvaultPaths::new(config_dir));
        let config = config_service.get_config();

        let log_dir = config_service.paths().logs_dir().ok();
        let log_guard =
            init_tracing(&config.log, log_dir.as_deref()).context("Failed to initialise logging")?;

        let backend = ProcessSearchBackend::spawn(&config.backend)
            .with_context(|| format!("Failed to start backend `{}`", config.backend.command))?;
        tracing::info!(command = %config.backend.command, pid = ?backend.pid(), "backend started");

        Ok(Self {
            config,
            backend: Arc::new(backend),
            _log_guard: log_guard,
        })
    }

    /// A fresh search view starting from `constraint`.
    pub fn search_usecase(
        &self,
        constraint: QueryConstraint,
        limit: Option<usize>,
    ) -> SearchUseCase {
        let mut policy = SearchPolicy::from(&self.config.search);
        if let Some(limit) = limit {
            policy.result_limit = limit;
        }
        SearchUseCase::with_constraint(self.backend.clone(), policy, constraint)
    }

    /// Starting query for a new view: empty text in the configured mode.
    pub fn initial_constraint(&self) -> QueryConstraint {
        QueryConstraint::new(self.config.search.default_mode)
    }

    pub fn backend(&self) -> Arc<dyn ClipSearchBackend> {
        self.backend.clone()
    }
}
