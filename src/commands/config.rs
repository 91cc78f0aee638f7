//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use prishare_core::config::AppConfig;
use prishare_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that the configuration is usable
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            let problems = validate(config);
            if !problems.is_empty() {
                for problem in &problems {
                    output::print_error(problem);
                }
                return Err(AppError::configuration(format!(
                    "{} configuration problem(s) in environment '{env}'",
                    problems.len()
                )));
            }

            output::print_success(&format!("Configuration for '{env}' is valid"));
            output::print_kv("Store", &config.store.provider);
            output::print_kv("Key prefix", &config.store.key_prefix);
            if config.store.provider == "redis" {
                output::print_kv("Redis", &mask_password(&config.store.redis.url));
            } else if config.store.provider == "file" {
                output::print_kv("Directory", &config.store.file.directory);
            }
            output::print_kv("Share origin", &config.share.origin);
        }
    }

    Ok(())
}

/// Problems that would make the configuration unusable.
fn validate(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if !matches!(config.store.provider.as_str(), "memory" | "file" | "redis") {
        problems.push(format!("Unknown store provider '{}'", config.store.provider));
    }
    if config.share.allowed_expiry_hours.is_empty() {
        problems.push("share.allowed_expiry_hours is empty".to_string());
    }
    if config.share.max_copies == 0 {
        problems.push("share.max_copies must be at least 1".to_string());
    }
    if config.security.pin_min_length == 0
        || config.security.pin_min_length > config.security.pin_max_length
    {
        problems.push(format!(
            "PIN length bounds {}..={} are invalid",
            config.security.pin_min_length, config.security.pin_max_length
        ));
    }

    problems
}

/// Mask password in a store URL for display
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
    {
        let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
        if colon_pos > scheme_end {
            let mut masked = url[..colon_pos + 1].to_string();
            masked.push_str("****");
            masked.push_str(&url[at_pos..]);
            return masked;
        }
    }
    url.to_string()
}
