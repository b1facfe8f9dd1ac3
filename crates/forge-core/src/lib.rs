//! Forge Core: data model, export formats, errors and configuration.
//!
//! Every other crate in the export engine builds on the types defined here.
//! Nothing in this crate performs I/O except [`ExportConfig::load`].

pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod format;

pub use config::ExportConfig;
pub use content::{BundleContent, RunMetadata, Scores, SevenDConfig, Telemetry};
pub use context::RenderOptions;
pub use error::ExportError;
pub use format::{parse_formats, ExportFormat};

/// Version stamped into every manifest unless overridden by config.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Minimum composite score required to export unless overridden by config.
pub const DEFAULT_READINESS_THRESHOLD: u32 = 80;
