use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::error::ForkctlError;
use crate::common::result::{ForkctlResult, OptionExt, ResultExt};

/// Whether the workspace root was found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePresence {
    Present,
    Absent,
}

/// Local directory holding the cloned forks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root_path: PathBuf,
}

impl Workspace {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// `<home>/<dir_name>`
    pub fn in_home(home: &Path, dir_name: &str) -> Self {
        Self::new(home.join(dir_name))
    }

    /// Workspace under the current user's home directory.
    pub fn for_current_user(dir_name: &str) -> ForkctlResult<Self> {
        let home = dirs::home_dir()
            .ok_or_internal_error("Could not determine the current user's home directory")?;
        Ok(Self::in_home(&home, dir_name))
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Path of a component repository inside the workspace.
    pub fn component_path(&self, name: &str) -> PathBuf {
        self.root_path.join(name)
    }

    /// Probe the root. A non-directory entry at the root is an error.
    pub fn presence(&self) -> ForkctlResult<WorkspacePresence> {
        match std::fs::metadata(&self.root_path) {
            Ok(meta) if meta.is_dir() => Ok(WorkspacePresence::Present),
            Ok(_) => Err(ForkctlError::workspace_error(
                "Workspace path exists but is not a directory",
                Some(self.root_path.clone()),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(WorkspacePresence::Absent),
            Err(e) => Err(ForkctlError::filesystem_error_with_source(
                "Failed to inspect workspace directory",
                Some(self.root_path.clone()),
                e,
            )),
        }
    }

    pub fn create(&self) -> ForkctlResult<()> {
        std::fs::create_dir_all(&self.root_path).with_filesystem_error(
            "Failed to create workspace directory",
            Some(self.root_path.clone()),
        )
    }

    /// Make the workspace the process working directory.
    pub fn enter(&self) -> ForkctlResult<()> {
        std::env::set_current_dir(&self.root_path).with_filesystem_error(
            "Failed to change into workspace directory",
            Some(self.root_path.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_home_joins_dir_name() {
        let workspace = Workspace::in_home(Path::new("/home/op"), "aether-forks");
        assert_eq!(workspace.root_path(), Path::new("/home/op/aether-forks"));
        assert_eq!(
            workspace.component_path("amf"),
            PathBuf::from("/home/op/aether-forks/amf")
        );
    }

    #[test]
    fn test_presence_and_create() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::in_home(temp_dir.path(), "aether-forks");

        assert_eq!(workspace.presence().unwrap(), WorkspacePresence::Absent);
        workspace.create().unwrap();
        assert_eq!(workspace.presence().unwrap(), WorkspacePresence::Present);
    }

    #[test]
    fn test_file_at_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("aether-forks");
        std::fs::write(&root, "not a directory").unwrap();

        let workspace = Workspace::new(&root);
        assert!(matches!(
            workspace.presence(),
            Err(ForkctlError::WorkspaceError { .. })
        ));
    }
}
