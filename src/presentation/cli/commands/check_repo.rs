use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::application::use_cases::check_workspace::{
    CheckWorkspaceError, CheckWorkspaceUseCase, WorkspaceOutcome,
};
use crate::application::use_cases::clone_repositories::{
    CloneReport, CloneRepositoriesConfig, CloneRepositoriesUseCase,
};
use crate::domain::entities::app_config::AppConfig;
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::github::GitHubClient;
use crate::infrastructure::process::SystemCommandRunner;

/// Handler for the checkRepo command
pub struct CheckRepoCommand {
    config: AppConfig,
}

impl CheckRepoCommand {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<()> {
        let workspace = Workspace::for_current_user(&self.config.workspace_dir)?;
        let runner = Arc::new(SystemCommandRunner::new(self.config.escalation.clone()));
        let source = Arc::new(GitHubClient::new(self.config.github_api_base.clone())?);
        let cloner = Arc::new(CloneRepositoriesUseCase::new(
            CloneRepositoriesConfig::from_app_config(&self.config),
            source,
            runner,
        ));

        let use_case = CheckWorkspaceUseCase::new(workspace, cloner);

        match use_case.execute(&self.config.credentials).await {
            Ok(WorkspaceOutcome::AlreadyPresent { root }) => {
                println!(
                    "{} Workspace {} already exists, nothing to clone",
                    "✓".green().bold(),
                    root.display()
                );
                Ok(())
            }
            Ok(WorkspaceOutcome::Created { report, .. }) => self.print_summary(&report),
            Err(CheckWorkspaceError::Clone(e)) => {
                Err(anyhow::anyhow!("Error cloning repositories: {}", e))
            }
            Err(e) => Err(anyhow::anyhow!("{}", e)),
        }
    }

    fn print_summary(&self, report: &CloneReport) -> Result<()> {
        if report.is_success() {
            println!(
                "{} Cloned {} repositories",
                "✓".green().bold(),
                report.succeeded.len()
            );
            return Ok(());
        }

        println!(
            "{} {} of {} clones failed:",
            "⚠".yellow().bold(),
            report.failed.len(),
            report.attempted
        );
        for failure in &report.failed {
            println!("  {}: {}", failure.repository.bold(), failure.error.red());
        }

        Err(anyhow::anyhow!(
            "{} of {} repositories could not be cloned",
            report.failed.len(),
            report.attempted
        ))
    }
}
