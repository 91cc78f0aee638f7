//! Share creation CLI command.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use prishare_core::error::{AppError, ErrorKind};
use prishare_core::types::format_file_size;
use prishare_entity::link::ColorMode;
use prishare_service::{AppServices, CreateShareRequest};

use crate::output::{self, OutputFormat};

/// Colour mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorArg {
    /// Full colour
    Color,
    /// Black and white
    Bw,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Color => ColorMode::Color,
            ColorArg::Bw => ColorMode::Bw,
        }
    }
}

/// Arguments for the share command
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// File to share
    pub file: PathBuf,
    /// MIME type (guessed from the extension when omitted)
    #[arg(short = 't', long = "type")]
    pub file_type: Option<String>,
    /// Colour mode
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,
    /// Number of copies
    #[arg(long)]
    pub copies: Option<u32>,
    /// Pages to print
    #[arg(long)]
    pub pages: Option<String>,
    /// Watermark text
    #[arg(long)]
    pub watermark: Option<String>,
    /// Protect the link with this PIN
    #[arg(long)]
    pub pin: Option<String>,
    /// Keep the document after it has been printed
    #[arg(long)]
    pub keep_after_print: bool,
    /// Delete the document once it has been viewed
    #[arg(long)]
    pub delete_after_view: bool,
    /// Link lifetime in hours
    #[arg(long)]
    pub expiry_hours: Option<u32>,
    /// Address the recipient can contact
    #[arg(long)]
    pub sender_email: Option<String>,
}

#[derive(Debug, Serialize)]
struct ShareOutput {
    link_id: String,
    url: String,
    file_name: String,
    file_size: u64,
    pin_required: bool,
    expires_at: String,
}

/// Execute the share command
pub async fn execute(
    args: &ShareArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), AppError> {
    let content = tokio::fs::read(&args.file).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Cannot read {}", args.file.display()),
            e,
        )
    })?;

    let file_type = match &args.file_type {
        Some(t) => t.clone(),
        None => guess_mime(&args.file).ok_or_else(|| {
            AppError::validation("Cannot tell the file type from its extension, pass --type")
        })?,
    };
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let created = services
        .shares
        .create_share(CreateShareRequest {
            file_name,
            file_type,
            content,
            color: args.color.map(ColorMode::from),
            copies: args.copies,
            pages: args.pages.clone(),
            watermark_text: args.watermark.clone(),
            pin: args.pin.clone(),
            auto_delete_after_print: Some(!args.keep_after_print),
            auto_delete_after_view: Some(args.delete_after_view),
            expiry_hours: args.expiry_hours,
            sender_email: args.sender_email.clone(),
        })
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&ShareOutput {
            link_id: created.link.id.to_string(),
            url: created.url.clone(),
            file_name: created.document.file_name.clone(),
            file_size: created.document.file_size,
            pin_required: created.link.pin_required,
            expires_at: created.document.expires_at.to_rfc3339(),
        }),
        OutputFormat::Table => {
            output::print_success("Link created");
            output::print_kv("URL", &created.url);
            output::print_kv("File", &created.document.file_name);
            output::print_kv("Size", &format_file_size(created.document.file_size));
            output::print_kv("Print", &created.link.print_settings.describe());
            output::print_kv(
                "PIN",
                if created.link.pin_required { "required" } else { "none" },
            );
            output::print_kv("Expires", &created.document.expires_at.to_rfc3339());
        }
    }

    Ok(())
}

/// MIME type for the extensions the share form accepts.
fn guess_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "ppt" => "application/vnd.ms-powerpoint",
        "doc" => "application/msword",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    };
    Some(mime.to_string())
}
