use std::path::PathBuf;
use thiserror::Error;

/// Failures of the workspace, configuration and build-target layer.
///
/// Process, HTTP and per-procedure failures have their own error types next
/// to the code that raises them.
#[derive(Error, Debug)]
pub enum ForkctlError {
    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        file_path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Workspace error: {message}")]
    WorkspaceError {
        message: String,
        workspace_path: Option<PathBuf>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ForkctlError {
    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>, file_path: Option<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            file_path,
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        file_path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            file_path,
            source: Some(Box::new(source)),
        }
    }

    pub fn workspace_error(message: impl Into<String>, workspace_path: Option<PathBuf>) -> Self {
        Self::WorkspaceError {
            message: message.into(),
            workspace_path,
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }
}
