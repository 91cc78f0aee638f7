//! Recipient-side CLI commands: view and print.

use clap::Args;

use prishare_core::error::AppError;
use prishare_core::types::{LinkId, format_file_size};
use prishare_entity::document::DocumentKind;
use prishare_service::{AccessError, AccessSession, AppServices, DeletionHandle};

use crate::output::{self, OutputFormat};

/// Arguments for view and print
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Link ID from the share URL
    pub id: LinkId,
    /// PIN, when the link is protected (prompted for otherwise)
    #[arg(long)]
    pub pin: Option<String>,
}

/// Open a link and view its document
pub async fn view(
    args: &AccessArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut session = open(args, services).await?;
    let grant = services.gate.view(&mut session).await?;

    match format {
        OutputFormat::Json => output::print_json(&grant.document),
        OutputFormat::Table => {
            let doc = &grant.document;
            output::print_kv("File", &doc.file_name);
            output::print_kv("Type", &doc.file_type);
            output::print_kv("Size", &format_file_size(doc.file_size));
            output::print_kv(
                "Preview",
                match doc.kind() {
                    DocumentKind::Image => "Inline image",
                    DocumentKind::Pdf => "Embedded PDF",
                    DocumentKind::Other => "Not available, print only",
                },
            );
            if let Some(watermark) = &doc.watermark_text {
                output::print_kv("Watermark", watermark);
            }
            output::print_kv("Print", &grant.link.print_settings.describe());
            output::print_kv("Expires", &doc.expires_at.to_rfc3339());
            output::print_kv(
                "Contact",
                grant
                    .sender_contact()
                    .unwrap_or("No contact information available for this document."),
            );
        }
    }

    if let Some(handle) = grant.deletion {
        finish_deletion(handle).await?;
    }
    services.gate.close(session).await?;
    Ok(())
}

/// Open a link and print its document
pub async fn print(
    args: &AccessArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut session = open(args, services).await?;
    let receipt = services.gate.print(&mut session).await?;

    match format {
        OutputFormat::Json => output::print_json(&receipt.link),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Sent {} to the printer ({})",
                session.document().file_name,
                receipt.link.print_settings.describe()
            ));
        }
    }

    if let Some(handle) = receipt.deletion {
        finish_deletion(handle).await?;
    }
    services.gate.close(session).await?;
    Ok(())
}

/// Open the link and get past the PIN, prompting until it is right.
async fn open(args: &AccessArgs, services: &AppServices) -> Result<AccessSession, AppError> {
    let mut session = services.gate.open(args.id).await?;
    if session.is_verified() {
        return Ok(session);
    }

    if let Some(pin) = &args.pin {
        services.gate.verify_pin(&mut session, pin).await?;
        return Ok(session);
    }

    loop {
        let pin = dialoguer::Password::new()
            .with_prompt("PIN")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        match services.gate.verify_pin(&mut session, &pin).await {
            Ok(()) => return Ok(session),
            Err(AccessError::PinIncorrect) => {
                output::print_error(&AccessError::PinIncorrect.to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Wait for a pending auto-delete so it is not lost when the process exits.
async fn finish_deletion(handle: DeletionHandle) -> Result<(), AppError> {
    if !handle.is_done() {
        output::print_warning("This document will be deleted shortly");
    }
    handle.wait().await
}
