use async_trait::async_trait;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::domain::entities::app_config::{AppConfig, GITHUB_ORGANIZATION};
use crate::domain::entities::repository::RepositoryDescriptor;
use crate::domain::value_objects::credentials::Credentials;
use crate::infrastructure::github::{RepositoryListingError, RepositorySource};
use crate::infrastructure::process::{CommandRunner, CommandSpec};

/// Bulk clone errors. Individual clone failures are not errors; they end
/// up in [`CloneReport::failed`].
#[derive(Debug, Error)]
pub enum CloneRepositoriesError {
    #[error("Failed to list repositories of '{organization}': {source}")]
    ListingFailed {
        organization: String,
        #[source]
        source: RepositoryListingError,
    },
}

/// Bulk clone settings
#[derive(Debug, Clone)]
pub struct CloneRepositoriesConfig {
    /// Owner whose repositories are listed
    pub organization: String,

    /// Concurrent clones
    pub max_parallel: usize,

    /// Per-clone limit in seconds
    pub timeout_seconds: Option<u64>,
}

impl Default for CloneRepositoriesConfig {
    fn default() -> Self {
        Self {
            organization: GITHUB_ORGANIZATION.to_string(),
            max_parallel: num_cpus::get(),
            timeout_seconds: None,
        }
    }
}

impl CloneRepositoriesConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_parallel: config.clone.max_parallel.max(1),
            timeout_seconds: config.clone.timeout_seconds,
            ..Self::default()
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

/// A clone that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneFailure {
    pub repository: String,
    pub error: String,
}

/// Aggregate of one bulk clone run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    /// Clone processes launched, one per listed repository
    pub attempted: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<CloneFailure>,
}

impl CloneReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, repository: String, outcome: Result<(), String>) {
        self.attempted += 1;
        match outcome {
            Ok(()) => self.succeeded.push(repository),
            Err(error) => self.failed.push(CloneFailure { repository, error }),
        }
    }
}

/// Clones every repository of the organization into a directory.
#[async_trait]
pub trait RepositoryCloner: Send + Sync {
    async fn clone_all(
        &self,
        target_dir: &Path,
        credentials: &Credentials,
    ) -> Result<CloneReport, CloneRepositoriesError>;
}

/// Lists the organization's repositories and clones them through a bounded pool
pub struct CloneRepositoriesUseCase {
    config: CloneRepositoriesConfig,
    source: Arc<dyn RepositorySource>,
    runner: Arc<dyn CommandRunner>,
}

impl CloneRepositoriesUseCase {
    pub fn new(
        config: CloneRepositoriesConfig,
        source: Arc<dyn RepositorySource>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            source,
            runner,
        }
    }

    pub async fn execute(
        &self,
        target_dir: &Path,
        credentials: &Credentials,
    ) -> Result<CloneReport, CloneRepositoriesError> {
        // 1. Fetch the listing; any failure here aborts the whole run
        let repos = self
            .source
            .list_repositories(&self.config.organization)
            .await
            .map_err(|source| CloneRepositoriesError::ListingFailed {
                organization: self.config.organization.clone(),
                source,
            })?;

        if !credentials.is_complete() && credentials.username().is_some() {
            tracing::warn!("username given without a token, cloning anonymously");
        }

        // 2. One unit per repository, at most `max_parallel` running
        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel.max(1)));
        let units = repos.iter().map(|repo| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let outcome = match semaphore.acquire().await {
                    Ok(_permit) => self.clone_one(repo, target_dir, credentials).await,
                    Err(_) => Err("clone pool closed".to_string()),
                };
                (repo.display_name().to_string(), outcome)
            }
        });

        // 3. Join every unit; no cancellation on sibling failure
        let outcomes = futures::future::join_all(units).await;

        let mut report = CloneReport::default();
        for (name, outcome) in outcomes {
            report.record(name, outcome);
        }

        println!("All repositories processed.");
        tracing::info!(
            attempted = report.attempted,
            failed = report.failed.len(),
            "bulk clone finished"
        );
        Ok(report)
    }

    async fn clone_one(
        &self,
        repo: &RepositoryDescriptor,
        target_dir: &Path,
        credentials: &Credentials,
    ) -> Result<(), String> {
        let shown = repo.clone_url.redacted(credentials);
        println!("{} Cloning {}...", "::".blue().bold(), shown);

        let spec = CommandSpec::new("git")
            .arg("clone")
            .arg(repo.clone_url.authenticated(credentials))
            .with_working_directory(target_dir)
            .with_timeout(self.config.timeout_seconds)
            .with_display(format!("git clone {shown}"));

        match self.runner.run_checked(&spec).await {
            Ok(_) => {
                println!("{} Successfully cloned {}", "✓".green().bold(), shown);
                Ok(())
            }
            Err(e) => {
                tracing::error!(repo = %repo.display_name(), error = %e, "clone failed");
                println!("{} Error cloning {}: {}", "✗".red().bold(), shown, e);
                Err(e.to_string())
            }
        }
    }
}

#[async_trait]
impl RepositoryCloner for CloneRepositoriesUseCase {
    async fn clone_all(
        &self,
        target_dir: &Path,
        credentials: &Credentials,
    ) -> Result<CloneReport, CloneRepositoriesError> {
        self.execute(target_dir, credentials).await
    }
}
