use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::application::use_cases::build_binaries::{BuildBinariesUseCase, BuildOutcome, BuildReport};
use crate::domain::entities::app_config::AppConfig;
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::process::SystemCommandRunner;

/// Handler for the operateBinaries command
pub struct OperateBinariesCommand {
    config: AppConfig,
}

impl OperateBinariesCommand {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<()> {
        let workspace = Workspace::for_current_user(&self.config.workspace_dir)?;
        let runner = Arc::new(SystemCommandRunner::new(self.config.escalation.clone()));
        let use_case = BuildBinariesUseCase::from_app_config(&self.config, &workspace, runner)?;

        let report = use_case.execute().await;
        self.print_summary(&report)
    }

    fn print_summary(&self, report: &BuildReport) -> Result<()> {
        println!(
            "{} Installed {} of {} binaries",
            "::".blue().bold(),
            report.installed_count(),
            report.targets.len()
        );

        if self.config.verbose || !report.is_success() {
            for target in &report.targets {
                let status = match &target.outcome {
                    BuildOutcome::Installed { destination, .. } => {
                        format!("installed at {}", destination.display()).green()
                    }
                    BuildOutcome::BuildFailed { .. } => "build failed".red(),
                    BuildOutcome::BinaryNotFound { .. } => "binary not found".yellow(),
                    BuildOutcome::MoveFailed { .. } => "move failed".red(),
                };
                println!("  {}: {}", target.name.bold(), status);
            }
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "{} of {} repositories were not installed",
                report.failure_count(),
                report.targets.len()
            ))
        }
    }
}
