//! Unified error model for the export pipeline.
use thiserror::Error;

use crate::format::ExportFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("No export formats requested")]
    NoFormats,

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Render failed for {format}: {reason}")]
    Render { format: ExportFormat, reason: String },

    #[error("Archive failed: {0}")]
    Archive(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ExportError {
    /// Build a render error for the given format.
    pub fn render(format: ExportFormat, reason: impl Into<String>) -> Self {
        ExportError::Render {
            format,
            reason: reason.into(),
        }
    }

    /// Whether the caller sent a bad request (as opposed to an engine failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExportError::UnsupportedFormat(_) | ExportError::NoFormats | ExportError::InvalidContent(_)
        )
    }

    /// Short stable label, used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::UnsupportedFormat(_) => "unsupported_format",
            ExportError::NoFormats => "no_formats",
            ExportError::InvalidContent(_) => "invalid_content",
            ExportError::Render { .. } => "render",
            ExportError::Archive(_) => "archive",
            ExportError::Serialize(_) => "serialize",
            ExportError::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_token() {
        let err = ExportError::UnsupportedFormat("bogus".to_string());
        assert_eq!(err.to_string(), "Unsupported format: bogus");
        assert!(err.is_client_error());
    }

    #[test]
    fn render_error_is_server_side() {
        let err = ExportError::render(ExportFormat::Md, "template missing");
        assert_eq!(err.to_string(), "Render failed for md: template missing");
        assert!(!err.is_client_error());
        assert_eq!(err.kind(), "render");
    }
}
