/// Infrastructure layer modules
///
/// Concrete implementations for talking to the outside world:
/// - Process execution (direct spawns, explicit pipes, privilege escalation)
/// - GitHub repository listing
/// - Configuration file loading
pub mod filesystem;
pub mod github;
pub mod process;

// Re-export commonly used types
pub use filesystem::config_store::{ConfigStore, FileConfig};
pub use github::{GitHubClient, RepositorySource};
pub use process::{CommandRunner, SystemCommandRunner};
