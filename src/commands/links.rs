//! Link management CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use prishare_core::error::AppError;
use prishare_core::types::{LinkId, format_relative_time};
use prishare_entity::link::SharedLink;
use prishare_service::AppServices;

use super::confirm;
use crate::output::{self, OutputFormat};

/// Arguments for link commands
#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Link subcommand
    #[command(subcommand)]
    pub command: LinksCommand,
}

/// Link subcommands
#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List every link, newest first
    List,
    /// Show one link
    Show {
        /// Link ID
        id: LinkId,
    },
    /// Revoke a link so it can no longer be used
    Revoke {
        /// Link ID
        id: LinkId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a link and its document
    Delete {
        /// Link ID
        id: LinkId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every link and document
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show recorded access attempts for a link
    Log {
        /// Link ID
        id: LinkId,
    },
}

/// Link display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LinkRow {
    /// Link ID
    id: String,
    /// File name
    file: String,
    /// Status
    status: String,
    /// PIN protection
    pin: String,
    /// Prints used
    uses: String,
    /// Created
    created: String,
}

impl LinkRow {
    fn from_link(link: &SharedLink) -> Self {
        Self {
            id: link.id.to_string(),
            file: link.file_name().to_string(),
            status: link.status.to_string(),
            pin: if link.pin_required { "yes" } else { "no" }.to_string(),
            uses: format!("{}/{}", link.use_count, link.max_uses),
            created: format_relative_time(link.created_at, Utc::now()),
        }
    }
}

/// Access log display row
#[derive(Debug, Serialize, Tabled)]
struct AccessRow {
    /// When
    at: String,
    /// Access type
    access: String,
    /// Outcome
    success: bool,
}

/// Execute link commands
pub async fn execute(
    args: &LinksArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        LinksCommand::List => {
            let links = services.shares.list_links().await?;
            let rows: Vec<LinkRow> = links.iter().map(LinkRow::from_link).collect();
            output::print_list(&rows, format);
        }
        LinksCommand::Show { id } => {
            let link = services.shares.get_link(*id).await?;
            match format {
                OutputFormat::Json => output::print_json(&link),
                OutputFormat::Table => print_link(&link, &services.shares.share_url(link.id)),
            }
        }
        LinksCommand::Revoke { id, yes } => {
            if !confirm("Revoke this link? It cannot be undone.", *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            let link = services.shares.revoke_link(*id).await?;
            output::print_success(&format!("Link {} revoked", link.id));
        }
        LinksCommand::Delete { id, yes } => {
            if !confirm("Delete this link and its document?", *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            services.shares.delete_link(*id).await?;
            output::print_success(&format!("Link {id} deleted"));
        }
        LinksCommand::Clear { yes } => {
            if !confirm("Delete ALL links and documents?", *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            let removed = services.shares.clear_history().await?;
            output::print_success(&format!("Removed {removed} link(s)"));
        }
        LinksCommand::Log { id } => {
            let entries = services.shares.access_log(*id).await?;
            let rows: Vec<AccessRow> = entries
                .iter()
                .map(|e| AccessRow {
                    at: e.created_at.to_rfc3339(),
                    access: e.access_type.to_string(),
                    success: e.success,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn print_link(link: &SharedLink, url: &str) {
    output::print_kv("ID", &link.id.to_string());
    output::print_kv("URL", url);
    output::print_kv("File", link.file_name());
    output::print_kv("Status", link.status.as_str());
    output::print_kv("Print", &link.print_settings.describe());
    output::print_kv("Uses", &format!("{}/{}", link.use_count, link.max_uses));
    output::print_kv("PIN", if link.pin_required { "required" } else { "none" });
    output::print_kv("Created", &link.created_at.to_rfc3339());
    if let Some(expires_at) = link.expires_at() {
        output::print_kv("Expires", &expires_at.to_rfc3339());
    }
    if let Some(at) = link.last_accessed_at {
        output::print_kv("Last viewed", &at.to_rfc3339());
    }
    if let Some(at) = link.printed_at {
        output::print_kv("Printed", &at.to_rfc3339());
    }
    if let Some(at) = link.revoked_at {
        output::print_kv("Revoked", &at.to_rfc3339());
    }
}
