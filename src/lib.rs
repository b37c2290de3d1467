//! # forkctl - operator tooling for the Aether core forks
//!
//! `forkctl` automates three chores around the `networkgcorefullcode` forks of
//! the Aether 5G core:
//!
//! - **checkRepo**: make sure `~/aether-forks` exists; when it has to be
//!   created, list every repository of the organization through the GitHub API
//!   and clone them through a bounded pool of `git clone` processes.
//! - **installmongo**: install MongoDB 7.0 from the official apt repository and
//!   turn it into a single-node replica set (`rs0`).
//! - **operateBinaries**: run `make all` in each network function repository
//!   and move the resulting binary into `/usr/local/bin`.
//!
//! ## Architecture
//!
//! - [`domain`]: workspace, build targets, MongoDB layout, credentials and clone URLs
//! - [`application`]: one use case per procedure
//! - [`infrastructure`]: process execution, the GitHub client and the config file
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: shared error handling
//!
//! Every external program runs through the
//! [`infrastructure::process::CommandRunner`] trait, so each procedure can be
//! driven by a fake runner.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forkctl::application::use_cases::build_binaries::BuildBinariesUseCase;
//! use forkctl::domain::entities::app_config::AppConfig;
//! use forkctl::domain::entities::workspace::Workspace;
//! use forkctl::infrastructure::process::SystemCommandRunner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let workspace = Workspace::for_current_user(&config.workspace_dir)?;
//! let runner = Arc::new(SystemCommandRunner::default());
//!
//! let report = BuildBinariesUseCase::from_app_config(&config, &workspace, runner)?
//!     .execute()
//!     .await;
//! println!("Installed {} binaries", report.installed_count());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ForkctlError;
pub use crate::common::result::ForkctlResult as Result;
