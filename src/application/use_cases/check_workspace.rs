use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::clone_repositories::{CloneReport, CloneRepositoriesError, RepositoryCloner};
use crate::common::error::ForkctlError;
use crate::domain::entities::workspace::{Workspace, WorkspacePresence};
use crate::domain::value_objects::credentials::Credentials;

#[derive(Debug, Error)]
pub enum CheckWorkspaceError {
    #[error("Workspace setup failed: {0}")]
    Workspace(#[from] ForkctlError),

    #[error("Cloning repositories failed: {0}")]
    Clone(#[from] CloneRepositoriesError),
}

/// What the check found or did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceOutcome {
    /// The directory existed; nothing was cloned
    AlreadyPresent { root: PathBuf },
    /// The directory was created and the bulk clone ran once
    Created { root: PathBuf, report: CloneReport },
}

impl WorkspaceOutcome {
    pub fn root(&self) -> &PathBuf {
        match self {
            Self::AlreadyPresent { root } | Self::Created { root, .. } => root,
        }
    }
}

/// Makes sure the forks workspace exists, cloning into it when it had to be created
pub struct CheckWorkspaceUseCase {
    workspace: Workspace,
    cloner: Arc<dyn RepositoryCloner>,
    /// Change the process working directory into the workspace
    enter_directory: bool,
}

impl CheckWorkspaceUseCase {
    pub fn new(workspace: Workspace, cloner: Arc<dyn RepositoryCloner>) -> Self {
        Self {
            workspace,
            cloner,
            enter_directory: true,
        }
    }

    pub fn with_enter_directory(mut self, enter_directory: bool) -> Self {
        self.enter_directory = enter_directory;
        self
    }

    pub async fn execute(
        &self,
        credentials: &Credentials,
    ) -> Result<WorkspaceOutcome, CheckWorkspaceError> {
        let root = self.workspace.root_path().to_path_buf();

        match self.workspace.presence()? {
            WorkspacePresence::Present => {
                self.enter()?;
                println!("Changed directory to: {}", root.display());
                tracing::info!(root = %root.display(), "workspace already present");
                Ok(WorkspaceOutcome::AlreadyPresent { root })
            }
            WorkspacePresence::Absent => {
                tracing::info!(root = %root.display(), "workspace missing, creating it");
                self.workspace.create()?;
                self.enter()?;
                println!("Created and changed directory to: {}", root.display());
                println!("Cloning repositories...");

                let report = self.cloner.clone_all(&root, credentials).await?;
                Ok(WorkspaceOutcome::Created { root, report })
            }
        }
    }

    fn enter(&self) -> Result<(), ForkctlError> {
        if self.enter_directory {
            self.workspace.enter()?;
        }
        Ok(())
    }
}
