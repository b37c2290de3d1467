use std::path::{Path, PathBuf};

use crate::common::result::{ForkctlResult, OptionExt};

/// A component repository whose `make` output gets installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    repo_path: PathBuf,
    name: String,
}

impl BuildTarget {
    /// The binary name is the repository directory's base name.
    pub fn new(repo_path: impl Into<PathBuf>) -> ForkctlResult<Self> {
        let repo_path = repo_path.into();
        let name = repo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_validation_error("repo_path", "repository path has no base name")?;
        Ok(Self { repo_path, name })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Probe order: `<repo>/<name>`, then `<repo>/bin/<name>`.
    pub fn candidate_binaries(&self) -> [PathBuf; 2] {
        [
            self.repo_path.join(&self.name),
            self.repo_path.join("bin").join(&self.name),
        ]
    }

    /// First candidate that exists as a file.
    pub fn locate_binary(&self) -> Option<PathBuf> {
        self.candidate_binaries().into_iter().find(|p| p.is_file())
    }

    pub fn destination(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_from_base_name() {
        let target = BuildTarget::new("/home/op/aether-forks/udm").unwrap();
        assert_eq!(target.name(), "udm");
        assert_eq!(
            target.destination(Path::new("/usr/local/bin")),
            PathBuf::from("/usr/local/bin/udm")
        );
    }

    #[test]
    fn test_root_path_is_rejected() {
        assert!(BuildTarget::new("/").is_err());
    }

    #[test]
    fn test_locate_prefers_repo_root() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("amf");
        std::fs::create_dir_all(repo.join("bin")).unwrap();
        std::fs::write(repo.join("amf"), b"root").unwrap();
        std::fs::write(repo.join("bin").join("amf"), b"bin").unwrap();

        let target = BuildTarget::new(&repo).unwrap();
        assert_eq!(target.locate_binary(), Some(repo.join("amf")));
    }

    #[test]
    fn test_locate_falls_back_to_bin() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("nrf");
        std::fs::create_dir_all(repo.join("bin")).unwrap();
        std::fs::write(repo.join("bin").join("nrf"), b"bin").unwrap();

        let target = BuildTarget::new(&repo).unwrap();
        assert_eq!(target.locate_binary(), Some(repo.join("bin").join("nrf")));
    }

    #[test]
    fn test_locate_none_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("pcf");
        std::fs::create_dir_all(&repo).unwrap();

        let target = BuildTarget::new(&repo).unwrap();
        assert_eq!(target.locate_binary(), None);
    }
}
