use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::CredentialVerifier;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::Role;
use crate::database::{DatabaseManager, Store};
use crate::services::{AccountError, AccountService, Registration};

#[derive(Subcommand)]
pub enum SuperuserCommands {
    #[command(about = "Create a system administrator account")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Display name")]
        full_name: String,
        #[arg(long, help = "Phone number (07XXXXXXXX)")]
        phone_number: String,
        #[arg(long, help = "16-digit national id")]
        national_id: String,
        #[arg(long, help = "Password")]
        password: String,
    },
}

pub async fn handle(cmd: SuperuserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SuperuserCommands::Create {
            email,
            full_name,
            phone_number,
            national_id,
            password,
        } => {
            let config = AppConfig::from_env().context("loading configuration")?;
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("superuser create needs DATABASE_URL")?;
            DatabaseManager::apply_schema(&pool).await?;

            let store = Store::postgres(pool);
            let service = AccountService::new(store.accounts, CredentialVerifier::new(&config.security));
            let registration = Registration {
                email,
                full_name,
                phone_number,
                national_id,
                password,
            };

            match service.register(registration, Role::SystemAdmin).await {
                Ok(account) => output_success(
                    output_format,
                    "System admin created",
                    Some(json!({ "id": account.id, "email": account.email })),
                ),
                Err(AccountError::Validation(errors)) => {
                    for (field, message) in &errors.0 {
                        output_error(output_format, &format!("{}: {}", field, message), Some("VALIDATION_ERROR"))?;
                    }
                    anyhow::bail!("invalid superuser details")
                }
                Err(e @ (AccountError::EmailTaken | AccountError::NationalIdTaken)) => {
                    output_error(output_format, &e.to_string(), Some("CONFLICT"))?;
                    anyhow::bail!(e)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
