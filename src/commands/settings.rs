//! Default share settings CLI commands.

use clap::{Args, Subcommand};

use prishare_core::error::AppError;
use prishare_entity::link::ColorMode;
use prishare_entity::settings::{Theme, UserSettings};
use prishare_service::{AppServices, UpdateSettingsRequest};

use super::share::ColorArg;
use crate::output::{self, OutputFormat};

/// Arguments for settings commands
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings subcommand
    #[command(subcommand)]
    pub command: SettingsCommand,
}

/// Theme as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeArg {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the current defaults
    Show,
    /// Change one or more defaults
    Set {
        /// Default colour mode
        #[arg(long, value_enum)]
        print_mode: Option<ColorArg>,
        /// Default copies
        #[arg(long)]
        copies: Option<u32>,
        /// Default expiry in hours
        #[arg(long)]
        expiry_hours: Option<u32>,
        /// Default watermark (empty to clear)
        #[arg(long)]
        watermark: Option<String>,
        /// Contact address shown to recipients (empty to clear)
        #[arg(long)]
        email: Option<String>,
        /// UI theme
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },
    /// Restore factory defaults
    Reset,
}

/// Execute settings commands
pub async fn execute(
    args: &SettingsArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), AppError> {
    let settings = match &args.command {
        SettingsCommand::Show => services.settings.get().await?,
        SettingsCommand::Set {
            print_mode,
            copies,
            expiry_hours,
            watermark,
            email,
            theme,
        } => {
            let updated = services
                .settings
                .update(UpdateSettingsRequest {
                    default_print_mode: print_mode.map(ColorMode::from),
                    default_copies: *copies,
                    default_expiry_hours: *expiry_hours,
                    default_watermark: watermark.clone().map(Some),
                    notification_email: email.clone().map(Some),
                    theme: theme.map(|t| match t {
                        ThemeArg::Light => Theme::Light,
                        ThemeArg::Dark => Theme::Dark,
                    }),
                })
                .await?;
            output::print_success("Settings saved");
            updated
        }
        SettingsCommand::Reset => {
            let reset = services.settings.reset().await?;
            output::print_success("Settings reset to defaults");
            reset
        }
    };

    match format {
        OutputFormat::Json => output::print_json(&settings),
        OutputFormat::Table => print_settings(&settings),
    }
    Ok(())
}

fn print_settings(settings: &UserSettings) {
    output::print_kv("Print mode", settings.default_print_mode.label());
    output::print_kv("Copies", &settings.default_copies.to_string());
    output::print_kv("Expiry (hours)", &settings.default_expiry_hours.to_string());
    output::print_kv(
        "Watermark",
        settings.default_watermark.as_deref().unwrap_or("(none)"),
    );
    output::print_kv(
        "Contact email",
        settings.notification_email.as_deref().unwrap_or("(none)"),
    );
    output::print_kv(
        "Theme",
        match settings.theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        },
    );
}
