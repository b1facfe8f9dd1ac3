//! Export format tokens
//!
//! The set of formats is closed. Caller-supplied tokens are parsed once at
//! the boundary; everything past [`parse_formats`] works with the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Md,
    Json,
    Pdf,
    Zip,
}

impl ExportFormat {
    /// All formats, in canonical order.
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Txt,
        ExportFormat::Md,
        ExportFormat::Json,
        ExportFormat::Pdf,
        ExportFormat::Zip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Md => "md",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Zip => "zip",
        }
    }

    /// Whether this format produces a content file (everything but `zip`).
    pub fn is_content(&self) -> bool {
        !matches!(self, ExportFormat::Zip)
    }

    /// File name inside a bundle. `zip` archives are named from the bundle id
    /// by the assembler, so they have no fixed name.
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Txt => Some("prompt.txt"),
            ExportFormat::Md => Some("prompt.md"),
            ExportFormat::Json => Some("prompt.json"),
            ExportFormat::Pdf => Some("prompt.pdf"),
            ExportFormat::Zip => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Md => "text/markdown; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Zip => "application/zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(ExportFormat::Txt),
            "md" => Ok(ExportFormat::Md),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            "zip" => Ok(ExportFormat::Zip),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parse a caller's format list.
///
/// Fails on an empty list or on the first unknown token. Duplicates are
/// dropped, keeping the order of first occurrence.
pub fn parse_formats<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<ExportFormat>, ExportError> {
    if tokens.is_empty() {
        return Err(ExportError::NoFormats);
    }

    let mut formats = Vec::with_capacity(tokens.len());
    for token in tokens {
        let format: ExportFormat = token.as_ref().parse()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}
