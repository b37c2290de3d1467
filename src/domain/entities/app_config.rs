use std::path::PathBuf;

use crate::domain::value_objects::credentials::Credentials;

/// Organization whose repositories make up the workspace.
///
/// Not configurable: only credentials come from the operator.
pub const GITHUB_ORGANIZATION: &str = "networkgcorefullcode";

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Largest page the repository listing endpoint serves.
pub const REPOSITORY_PAGE_SIZE: u32 = 100;

pub const DEFAULT_WORKSPACE_DIR: &str = "aether-forks";

pub const DEFAULT_COMPONENTS: [&str; 9] = [
    "amf", "ausf", "nrf", "nssf", "pcf", "simapp", "smf", "udm", "udr",
];

pub const DEFAULT_BUILD_TARGET: &str = "all";

pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

pub const DEFAULT_ESCALATION: &str = "sudo";

/// Clone pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSettings {
    /// Concurrent `git clone` processes
    pub max_parallel: usize,
    /// Per-clone limit; `None` waits forever
    pub timeout_seconds: Option<u64>,
}

impl Default for CloneSettings {
    fn default() -> Self {
        Self {
            max_parallel: num_cpus::get(),
            timeout_seconds: None,
        }
    }
}

/// Binary builder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Component directories under the workspace, built in this order
    pub components: Vec<String>,
    /// `make` target
    pub target: String,
    pub install_dir: PathBuf,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS.iter().map(|c| c.to_string()).collect(),
            target: DEFAULT_BUILD_TARGET.to_string(),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
        }
    }
}

/// Resolved settings for one run, built from flags and the optional config file
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub workspace_dir: String,
    pub clone: CloneSettings,
    pub build: BuildSettings,
    /// Program that prefixes privileged commands; `None` runs them directly
    pub escalation: Option<String>,
    pub github_api_base: String,
    /// Install the seed databases after the replica set is up
    pub init_databases: bool,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::anonymous(),
            workspace_dir: DEFAULT_WORKSPACE_DIR.to_string(),
            clone: CloneSettings::default(),
            build: BuildSettings::default(),
            escalation: Some(DEFAULT_ESCALATION.to_string()),
            github_api_base: GITHUB_API_BASE.to_string(),
            init_databases: false,
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.clone.max_parallel = max_parallel.max(1);
        self
    }

    pub fn with_clone_timeout(mut self, timeout_seconds: u64) -> Self {
        self.clone.timeout_seconds = Some(timeout_seconds);
        self
    }

    pub fn with_install_dir(mut self, install_dir: impl Into<PathBuf>) -> Self {
        self.build.install_dir = install_dir.into();
        self
    }

    pub fn with_init_databases(mut self, init_databases: bool) -> Self {
        self.init_databases = init_databases;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.workspace_dir, "aether-forks");
        assert_eq!(config.build.components.len(), 9);
        assert_eq!(config.build.components[0], "amf");
        assert_eq!(config.build.components[8], "udr");
        assert_eq!(config.build.target, "all");
        assert_eq!(config.build.install_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(config.escalation.as_deref(), Some("sudo"));
        assert!(config.clone.max_parallel >= 1);
        assert!(config.clone.timeout_seconds.is_none());
        assert!(!config.credentials.is_complete());
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_credentials(Credentials::new(Some("u".into()), Some("t".into())))
            .with_max_parallel(0)
            .with_clone_timeout(600)
            .with_install_dir("/opt/bin")
            .with_init_databases(true)
            .with_verbose(true);

        assert!(config.credentials.is_complete());
        assert_eq!(config.clone.max_parallel, 1);
        assert_eq!(config.clone.timeout_seconds, Some(600));
        assert_eq!(config.build.install_dir, PathBuf::from("/opt/bin"));
        assert!(config.init_databases);
        assert!(config.verbose);
    }
}
