use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::manager::SCHEMA;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create missing tables and indexes in DATABASE_URL")]
    Apply,

    #[command(about = "Print the bootstrap schema SQL")]
    Print,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Apply => {
            let config = AppConfig::from_env().context("loading configuration")?;
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("schema apply needs DATABASE_URL")?;
            DatabaseManager::apply_schema(&pool).await?;
            output_success(output_format, "Schema applied", None)
        }
        SchemaCommands::Print => {
            print!("{}", SCHEMA);
            Ok(())
        }
    }
}
