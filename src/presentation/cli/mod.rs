pub mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::domain::entities::app_config::AppConfig;
use crate::domain::value_objects::credentials::Credentials;
use crate::infrastructure::filesystem::config_store::{ConfigStore, FileConfig};

use commands::{CheckRepoCommand, InstallMongoCommand, OperateBinariesCommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("GIT_HASH"),
    "\nbuilt: ",
    env!("BUILD_DATE"),
    "\ntarget: ",
    env!("BUILD_TARGET"),
);

/// forkctl - Operator tooling for the Aether 5G core forks
#[derive(Parser)]
#[command(name = "forkctl")]
#[command(about = "Clone the Aether core forks, install MongoDB and build the network functions")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to $FORKCTL_CONFIG when set)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Make sure ~/aether-forks exists, cloning every fork when it has to be created
    #[command(name = "checkRepo", alias = "check-repo")]
    CheckRepo {
        /// GitHub user for authenticated clones
        #[arg(short = 'u', long, env = "GITHUB_USER")]
        user: Option<String>,

        /// GitHub token for authenticated clones
        #[arg(short = 'k', long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Maximum number of concurrent clones
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Kill a clone that runs longer than this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Install MongoDB 7.0 and configure a single-node replica set
    #[command(name = "installmongo", alias = "install-mongo")]
    InstallMongo {
        /// Create the webuiDB and authdb databases once the replica set is up
        #[arg(long)]
        init_databases: bool,
    },

    /// Build every network function and install its binary
    #[command(name = "operateBinaries", alias = "operate-binaries")]
    OperateBinaries {
        /// Destination directory for the binaries
        #[arg(long, value_name = "DIR")]
        install_dir: Option<PathBuf>,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        self.init_tracing();

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    /// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
    fn init_tracing(&self) {
        let default_level = if self.cli.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let file = ConfigStore::new().load(self.cli.config.as_deref()).await?;
        let config = self.cli.resolve_config(file);

        match &self.cli.command {
            Commands::CheckRepo { .. } => CheckRepoCommand::new(config).execute().await,
            Commands::InstallMongo { .. } => InstallMongoCommand::new(config).execute().await,
            Commands::OperateBinaries { .. } => {
                OperateBinariesCommand::new(config).execute().await
            }
        }
    }
}

impl Cli {
    /// Defaults, overlaid with the config file when there is one, then with
    /// the flags given on the command line.
    pub fn resolve_config(&self, file: Option<FileConfig>) -> AppConfig {
        let mut config = AppConfig::default().with_verbose(self.verbose);
        if let Some(file) = file {
            file.apply_to(&mut config);
        }

        match &self.command {
            Commands::CheckRepo {
                user,
                token,
                jobs,
                timeout,
            } => {
                config = config.with_credentials(Credentials::new(user.clone(), token.clone()));
                if let Some(jobs) = jobs {
                    config = config.with_max_parallel(*jobs);
                }
                if let Some(timeout) = timeout {
                    config = config.with_clone_timeout(*timeout);
                }
            }
            Commands::InstallMongo { init_databases } => {
                if *init_databases {
                    config = config.with_init_databases(true);
                }
            }
            Commands::OperateBinaries { install_dir } => {
                if let Some(dir) = install_dir {
                    config = config.with_install_dir(dir.clone());
                }
            }
        }

        config
    }
}
