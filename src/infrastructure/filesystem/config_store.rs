use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::error::ForkctlError;
use crate::common::result::ForkctlResult;
use crate::domain::entities::app_config::AppConfig;

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_PATH_ENV: &str = "FORKCTL_CONFIG";

/// Clone section of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloneSection {
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Build section of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub components: Option<Vec<String>>,
    pub target: Option<String>,
    pub install_dir: Option<PathBuf>,
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workspace_dir: Option<String>,
    #[serde(default)]
    pub clone: CloneSection,
    #[serde(default)]
    pub build: BuildSection,
}

impl FileConfig {
    pub fn from_yaml(content: &str, origin: &Path) -> ForkctlResult<Self> {
        let config: FileConfig = serde_yaml::from_str(content).map_err(|e| {
            ForkctlError::config_error_with_source(
                "Failed to parse configuration file",
                Some(origin.to_path_buf()),
                e,
            )
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> ForkctlResult<()> {
        if let Some(dir) = &self.workspace_dir {
            if !is_plain_dir_name(dir) {
                return Err(ForkctlError::config_error(
                    format!("workspace_dir must be a plain directory name, got '{dir}'"),
                    Some(origin.to_path_buf()),
                ));
            }
        }
        if self.clone.jobs == Some(0) {
            return Err(ForkctlError::config_error(
                "clone.jobs must be at least 1",
                Some(origin.to_path_buf()),
            ));
        }
        if let Some(components) = &self.build.components {
            if let Some(bad) = components.iter().find(|c| !is_plain_dir_name(c)) {
                return Err(ForkctlError::config_error(
                    format!("build.components entries must be directory names, got '{bad}'"),
                    Some(origin.to_path_buf()),
                ));
            }
        }
        Ok(())
    }

    /// Overlay the values present in the file onto `config`.
    pub fn apply_to(self, config: &mut AppConfig) {
        if let Some(dir) = self.workspace_dir {
            config.workspace_dir = dir;
        }
        if let Some(jobs) = self.clone.jobs {
            config.clone.max_parallel = jobs;
        }
        if let Some(timeout) = self.clone.timeout_secs {
            config.clone.timeout_seconds = Some(timeout);
        }
        if let Some(components) = self.build.components {
            config.build.components = components;
        }
        if let Some(target) = self.build.target {
            config.build.target = target;
        }
        if let Some(install_dir) = self.build.install_dir {
            config.build.install_dir = install_dir;
        }
    }
}

/// A single path component that names a child directory.
fn is_plain_dir_name(name: &str) -> bool {
    !matches!(name.trim(), "" | "." | "..") && !name.contains('/')
}

/// Loads the optional YAML configuration file
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// An explicit path must exist. Without one, `$FORKCTL_CONFIG` is used
    /// when set; otherwise there is no file and defaults apply.
    pub async fn load(&self, explicit: Option<&Path>) -> ForkctlResult<Option<FileConfig>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(path) if !path.is_empty() => PathBuf::from(path),
                _ => return Ok(None),
            },
        };

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ForkctlError::config_error_with_source(
                "Failed to read configuration file",
                Some(path.clone()),
                e,
            )
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        FileConfig::from_yaml(&content, &path).map(Some)
    }
}
