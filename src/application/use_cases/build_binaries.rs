use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::common::error::ForkctlError;
use crate::domain::entities::app_config::AppConfig;
use crate::domain::entities::build_target::BuildTarget;
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::process::{CommandExecutorError, CommandRunner, CommandSpec};

#[derive(Debug, Error)]
pub enum BuildBinariesError {
    #[error("Invalid build target: {0}")]
    InvalidTarget(#[from] ForkctlError),
}

/// What happened to one repository
#[derive(Debug)]
pub enum BuildOutcome {
    Installed {
        source: PathBuf,
        destination: PathBuf,
    },
    BuildFailed {
        error: CommandExecutorError,
    },
    BinaryNotFound {
        searched: Vec<PathBuf>,
    },
    MoveFailed {
        error: CommandExecutorError,
    },
}

impl BuildOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

#[derive(Debug)]
pub struct TargetReport {
    pub name: String,
    pub outcome: BuildOutcome,
}

/// One entry per repository, in build order
#[derive(Debug, Default)]
pub struct BuildReport {
    pub targets: Vec<TargetReport>,
}

impl BuildReport {
    pub fn installed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.outcome.is_installed()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.targets.len() - self.installed_count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Builds each component repository and installs its binary
pub struct BuildBinariesUseCase {
    targets: Vec<BuildTarget>,
    make_target: String,
    install_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl BuildBinariesUseCase {
    pub fn new(
        targets: Vec<BuildTarget>,
        make_target: impl Into<String>,
        install_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            targets,
            make_target: make_target.into(),
            install_dir: install_dir.into(),
            runner,
        }
    }

    /// Targets are the configured components inside `workspace`.
    pub fn from_app_config(
        config: &AppConfig,
        workspace: &Workspace,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, BuildBinariesError> {
        let targets = config
            .build
            .components
            .iter()
            .map(|name| BuildTarget::new(workspace.component_path(name)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            targets,
            config.build.target.clone(),
            config.build.install_dir.clone(),
            runner,
        ))
    }

    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Processes every target in order. A failure only ends that target's
    /// iteration.
    pub async fn execute(&self) -> BuildReport {
        let mut report = BuildReport::default();

        for target in &self.targets {
            let outcome = self.build_one(target).await;
            report.targets.push(TargetReport {
                name: target.name().to_string(),
                outcome,
            });
        }

        tracing::info!(
            installed = report.installed_count(),
            failed = report.failure_count(),
            "binary build finished"
        );
        report
    }

    async fn build_one(&self, target: &BuildTarget) -> BuildOutcome {
        let name = target.name();
        println!("{} Building {}", "::".blue().bold(), name.bold());

        let make = CommandSpec::new("make")
            .arg(&self.make_target)
            .with_working_directory(target.repo_path());
        if let Err(error) = self.runner.run_checked(&make).await {
            println!("{} Error building {}: {}", "✗".red(), name, error);
            tracing::error!(repo = %name, error = %error, "build failed");
            return BuildOutcome::BuildFailed { error };
        }

        let Some(source) = target.locate_binary() else {
            let searched = target.candidate_binaries().to_vec();
            println!("{} Binary not found for {}", "⚠".yellow(), name);
            tracing::warn!(repo = %name, ?searched, "binary not found");
            return BuildOutcome::BinaryNotFound { searched };
        };

        let destination = target.destination(&self.install_dir);
        match self.install(&source, &destination).await {
            Ok(()) => {
                println!(
                    "{} Installed {} to {}",
                    "✓".green(),
                    name,
                    destination.display()
                );
                BuildOutcome::Installed {
                    source,
                    destination,
                }
            }
            Err(error) => {
                println!("{} Error moving {}: {}", "✗".red(), name, error);
                tracing::error!(repo = %name, error = %error, "move failed");
                BuildOutcome::MoveFailed { error }
            }
        }
    }

    async fn install(&self, source: &Path, destination: &Path) -> Result<(), CommandExecutorError> {
        let mv = CommandSpec::new("mv")
            .path_arg(source)
            .path_arg(destination)
            .privileged();
        self.runner.run_checked(&mv).await.map(|_| ())
    }
}
