//! CLI command definitions and dispatch.

pub mod access;
pub mod config;
pub mod links;
pub mod settings;
pub mod share;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use prishare_core::config::AppConfig;
use prishare_core::error::AppError;
use prishare_core::traits::clock::SystemClock;
use prishare_database::Database;
use prishare_service::AppServices;
use prishare_store::StoreManager;

use crate::output::OutputFormat;

/// PriShare: print-only document sharing with single-use links
#[derive(Debug, Parser)]
#[command(name = "prishare", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "PRISHARE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Share a file and print its link
    Share(share::ShareArgs),
    /// Manage shared links
    Links(links::LinksArgs),
    /// Open a link and view its document
    View(access::AccessArgs),
    /// Open a link and print its document
    Print(access::AccessArgs),
    /// Default share settings
    Settings(settings::SettingsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, &self.env, self.format).await;
        }

        let services = build_services(&config).await?;
        match &self.command {
            Commands::Share(args) => share::execute(args, &services, self.format).await,
            Commands::Links(args) => links::execute(args, &services, self.format).await,
            Commands::View(args) => access::view(args, &services, self.format).await,
            Commands::Print(args) => access::print(args, &services, self.format).await,
            Commands::Settings(args) => settings::execute(args, &services, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Helper: open the configured store and wire the services over it
pub async fn build_services(config: &AppConfig) -> Result<AppServices, AppError> {
    let manager = StoreManager::new(&config.store).await?;
    let db = Database::from_manager(&manager);
    if !db.health_check().await? {
        return Err(AppError::storage(format!(
            "Store '{}' is not healthy",
            config.store.provider
        )));
    }
    Ok(AppServices::new(db, config, Arc::new(SystemClock)))
}

/// Helper: ask for confirmation unless `--yes` was given
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, AppError> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
