use colored::Colorize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempPath;
use thiserror::Error;

use crate::domain::entities::mongo_setup::{MongoSetup, SEED_DATABASES_SCRIPT};
use crate::infrastructure::process::{CommandExecutorError, CommandRunner, CommandSpec};

/// Installer steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    ImportKey,
    AddRepository,
    InstallPackage,
    EnableService,
    ConfigureReplicaSet,
    RestartService,
    InitiateReplicaSet,
    SeedDatabases,
}

impl InstallStep {
    /// The fixed sequence, without the optional seeding step.
    pub const CORE: [InstallStep; 7] = [
        InstallStep::ImportKey,
        InstallStep::AddRepository,
        InstallStep::InstallPackage,
        InstallStep::EnableService,
        InstallStep::ConfigureReplicaSet,
        InstallStep::RestartService,
        InstallStep::InitiateReplicaSet,
    ];

    pub fn number(self) -> usize {
        match self {
            Self::ImportKey => 1,
            Self::AddRepository => 2,
            Self::InstallPackage => 3,
            Self::EnableService => 4,
            Self::ConfigureReplicaSet => 5,
            Self::RestartService => 6,
            Self::InitiateReplicaSet => 7,
            Self::SeedDatabases => 8,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ImportKey => "Importing MongoDB public key",
            Self::AddRepository => "Adding MongoDB repository",
            Self::InstallPackage => "Installing MongoDB",
            Self::EnableService => "Configuring MongoDB service",
            Self::ConfigureReplicaSet => "Configuring ReplicaSet",
            Self::RestartService => "Restarting MongoDB",
            Self::InitiateReplicaSet => "Initializing ReplicaSet",
            Self::SeedDatabases => "Creating application databases",
        }
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.description())
    }
}

#[derive(Debug, Error)]
pub enum InstallMongoError {
    #[error("Step {step} failed: {source}")]
    CommandFailed {
        step: InstallStep,
        #[source]
        source: CommandExecutorError,
    },

    #[error("Step {step} failed: could not write {}: {source}", path.display())]
    StagingFailed {
        step: InstallStep,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallMongoError {
    pub fn step(&self) -> InstallStep {
        match self {
            Self::CommandFailed { step, .. } | Self::StagingFailed { step, .. } => *step,
        }
    }
}

/// Steps that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub completed: Vec<InstallStep>,
}

/// Installs MongoDB and turns it into a single-node replica set
pub struct InstallMongoUseCase {
    setup: MongoSetup,
    runner: Arc<dyn CommandRunner>,
    init_databases: bool,
}

impl InstallMongoUseCase {
    pub fn new(setup: MongoSetup, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            setup,
            runner,
            init_databases: false,
        }
    }

    pub fn with_init_databases(mut self, init_databases: bool) -> Self {
        self.init_databases = init_databases;
        self
    }

    pub fn steps(&self) -> Vec<InstallStep> {
        let mut steps = InstallStep::CORE.to_vec();
        if self.init_databases {
            steps.push(InstallStep::SeedDatabases);
        }
        steps
    }

    /// Runs every step in order and stops at the first failure. Nothing is
    /// rolled back.
    pub async fn execute(&self) -> Result<InstallReport, InstallMongoError> {
        let mut report = InstallReport::default();

        for step in self.steps() {
            println!("{} {}...", "🔹".blue(), step.description());
            tracing::info!(step = step.number(), "running install step");

            if let Err(e) = self.run_step(step).await {
                tracing::error!(step = step.number(), error = %e, "install step failed");
                return Err(e);
            }
            report.completed.push(step);
        }

        Ok(report)
    }

    async fn run_step(&self, step: InstallStep) -> Result<(), InstallMongoError> {
        let setup = &self.setup;
        match step {
            InstallStep::ImportKey => {
                let download = CommandSpec::new("curl").arg("-fsSL").arg(&setup.key_url);
                let dearmor = CommandSpec::new("gpg")
                    .arg("-o")
                    .path_arg(&setup.keyring_path)
                    .arg("--dearmor")
                    .privileged();
                self.checked_pipeline(step, &download, &dearmor).await
            }
            InstallStep::AddRepository => {
                let tee = CommandSpec::new("tee")
                    .path_arg(&setup.source_list_path)
                    .with_input(setup.apt_source_line())
                    .privileged();
                self.checked(step, &tee).await
            }
            InstallStep::InstallPackage => {
                self.checked(step, &CommandSpec::new("apt").arg("update").privileged())
                    .await?;
                let install = CommandSpec::new("apt")
                    .args(["install", "-y"])
                    .arg(&setup.package)
                    .privileged();
                self.checked(step, &install).await
            }
            InstallStep::EnableService => {
                for action in ["enable", "start"] {
                    self.checked(step, &self.systemctl(action)).await?;
                }
                Ok(())
            }
            InstallStep::ConfigureReplicaSet => self.rewrite_config(step).await,
            InstallStep::RestartService => self.checked(step, &self.systemctl("restart")).await,
            InstallStep::InitiateReplicaSet => {
                let initiate = CommandSpec::new(&setup.shell)
                    .arg("--eval")
                    .arg(setup.replica_set.initiate_expression());
                self.checked(step, &initiate).await
            }
            InstallStep::SeedDatabases => {
                let seed = CommandSpec::new(&setup.shell)
                    .arg("--eval")
                    .arg(SEED_DATABASES_SCRIPT)
                    .with_display(format!("{} --eval <seed script>", setup.shell));
                self.checked(step, &seed).await
            }
        }
    }

    /// Back up the current file, stage the new content, move it into place.
    async fn rewrite_config(&self, step: InstallStep) -> Result<(), InstallMongoError> {
        let setup = &self.setup;
        let backup = CommandSpec::new("cp")
            .path_arg(&setup.config_path)
            .path_arg(&setup.backup_path())
            .privileged();
        self.checked(step, &backup).await?;

        // Removed on drop unless the move below succeeds.
        let staged = self.stage_config(step)?;
        let replace = CommandSpec::new("mv")
            .path_arg(&staged)
            .path_arg(&setup.config_path)
            .privileged();
        self.checked(step, &replace).await?;

        let _ = staged.keep();
        Ok(())
    }

    /// Write the new content to a freshly created, uniquely named file in
    /// the staging directory. An existing entry is never reused.
    fn stage_config(&self, step: InstallStep) -> Result<TempPath, InstallMongoError> {
        let setup = &self.setup;
        let failed = |source: std::io::Error| InstallMongoError::StagingFailed {
            step,
            path: setup.staging_dir.clone(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix(&setup.staging_prefix())
            .suffix(".new")
            .tempfile_in(&setup.staging_dir)
            .map_err(failed)?;
        file.write_all(setup.config_block().as_bytes()).map_err(failed)?;

        // mongod reads its configuration as an unprivileged user
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(failed)?;
        }

        tracing::debug!(path = %file.path().display(), "staged mongod configuration");
        Ok(file.into_temp_path())
    }

    fn systemctl(&self, action: &str) -> CommandSpec {
        CommandSpec::new("systemctl")
            .arg(action)
            .arg(&self.setup.service)
            .privileged()
    }

    async fn checked(&self, step: InstallStep, spec: &CommandSpec) -> Result<(), InstallMongoError> {
        self.runner
            .run_checked(spec)
            .await
            .map(|_| ())
            .map_err(|source| InstallMongoError::CommandFailed { step, source })
    }

    async fn checked_pipeline(
        &self,
        step: InstallStep,
        upstream: &CommandSpec,
        downstream: &CommandSpec,
    ) -> Result<(), InstallMongoError> {
        self.runner
            .run_pipeline_checked(upstream, downstream)
            .await
            .map(|_| ())
            .map_err(|source| InstallMongoError::CommandFailed { step, source })
    }
}
