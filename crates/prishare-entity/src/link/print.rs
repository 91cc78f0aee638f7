//! Print settings attached to a link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour mode requested for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Full colour.
    Color,
    /// Black and white.
    #[default]
    Bw,
}

impl ColorMode {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Bw => "Black & White",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Bw => write!(f, "bw"),
        }
    }
}

/// Print settings requested by the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    /// Colour mode.
    pub color: ColorMode,
    /// Number of copies (1..=10 by default policy).
    pub copies: u32,
    /// Page selection, `"all"` or a range expression such as `"1-3,5"`.
    pub pages: String,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            color: ColorMode::Bw,
            copies: 1,
            pages: "all".to_string(),
        }
    }
}

impl PrintSettings {
    /// Summary line, e.g. `"Black & White, 2 copies"`.
    pub fn describe(&self) -> String {
        let noun = if self.copies == 1 { "copy" } else { "copies" };
        format!("{}, {} {noun}", self.color.label(), self.copies)
    }
}
