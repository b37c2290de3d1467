use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::application::use_cases::install_mongo::{
    InstallMongoError, InstallMongoUseCase, InstallReport,
};
use crate::domain::entities::app_config::AppConfig;
use crate::domain::entities::mongo_setup::MongoSetup;
use crate::infrastructure::process::SystemCommandRunner;

/// Handler for the installmongo command
pub struct InstallMongoCommand {
    config: AppConfig,
}

impl InstallMongoCommand {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<()> {
        let runner = Arc::new(SystemCommandRunner::new(self.config.escalation.clone()));
        let use_case = InstallMongoUseCase::new(MongoSetup::default(), runner)
            .with_init_databases(self.config.init_databases);

        println!("Starting MongoDB installation and configuration...");

        let outcome = use_case.execute().await;
        self.conclude(outcome)
    }

    fn conclude(&self, outcome: Result<InstallReport, InstallMongoError>) -> Result<()> {
        match outcome {
            Ok(report) => {
                println!(
                    "{} MongoDB installation and configuration completed successfully!",
                    "✓".green().bold()
                );
                if self.config.verbose {
                    println!("  Steps completed: {}", report.completed.len());
                }
                println!("To verify the installation, run: mongosh --eval 'rs.status()'");
                Ok(())
            }
            Err(e) => {
                println!("{} {}", "✗".red().bold(), e);
                Err(anyhow::anyhow!(
                    "MongoDB installation stopped at step {}; completed steps were not rolled back",
                    e.step().number()
                ))
            }
        }
    }
}
