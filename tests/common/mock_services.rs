//! Fake implementations of the process and listing seams

use async_trait::async_trait;
use std::sync::Mutex;

use forkctl::domain::entities::repository::RepositoryDescriptor;
use forkctl::infrastructure::github::{RepositoryListingError, RepositorySource};
use forkctl::infrastructure::process::{
    CommandExecutorError, CommandRunner, CommandSpec, ExecutionResult,
};

/// Records every command and fails the ones matching a rule.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    /// Substrings of the display form that make a command exit 1
    failing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }

    pub fn count(&self, program: &str) -> usize {
        self.calls().iter().filter(|c| c.program == program).count()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, CommandExecutorError> {
        self.calls.lock().unwrap().push(spec.clone());
        let display = spec.display();
        let failed = self.failing.iter().any(|needle| display.contains(needle.as_str()));
        Ok(ExecutionResult::new(display, Some(if failed { 1 } else { 0 }), 0))
    }

    async fn run_pipeline(
        &self,
        upstream: &CommandSpec,
        downstream: &CommandSpec,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        let first = self.run(upstream).await?;
        if !first.success {
            return Ok(first);
        }
        self.run(downstream).await
    }
}

/// Serves a fixed listing, or a fixed HTTP status as an error.
pub struct StaticRepositorySource {
    repositories: Vec<RepositoryDescriptor>,
    status: Option<u16>,
    requested: Mutex<Vec<String>>,
}

impl StaticRepositorySource {
    pub fn new(repositories: Vec<RepositoryDescriptor>) -> Self {
        Self {
            repositories,
            status: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with(status: u16) -> Self {
        Self {
            repositories: Vec::new(),
            status: Some(status),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorySource for StaticRepositorySource {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, RepositoryListingError> {
        self.requested.lock().unwrap().push(organization.to_string());
        match self.status {
            Some(status) => Err(RepositoryListingError::UnexpectedStatus {
                url: format!("static://{organization}"),
                status,
            }),
            None => Ok(self.repositories.clone()),
        }
    }
}
