//! Forge Bundle: the export pipeline's entry point
//!
//! # Pipeline Flow
//!
//! ```text
//! formats → parse → render (txt/md/json/pdf) → telemetry.json
//!                                          ↓
//!                     manifest.json + checksum.txt → [zip] → Bundle
//! ```
//!
//! Everything happens in memory and nothing is persisted. A failure at any
//! step aborts the call; there is never a partial bundle.
//!
//! # Example
//!
//! ```ignore
//! let bundle = forge_bundle::generate_bundle(&content, &["txt", "md", "json"], false)?;
//! assert_eq!(bundle.files.len(), 5);
//! ```

pub mod archive;
pub mod assembler;
pub mod telemetry;

pub use archive::{read_archive, verify_archive, write_archive};
pub use assembler::{Bundle, BundleAssembler};
pub use telemetry::TELEMETRY_FILE;

use forge_core::{BundleContent, ExportError, RenderOptions};
use once_cell::sync::Lazy;

static DEFAULT_ASSEMBLER: Lazy<Result<BundleAssembler, ExportError>> = Lazy::new(BundleAssembler::builtin);

/// Build a bundle with the built-in config.
///
/// `formats` are caller tokens (`txt`, `md`, `json`, `pdf`, `zip`); an
/// unknown token fails with [`ExportError::UnsupportedFormat`].
pub fn generate_bundle<S: AsRef<str>>(
    content: &BundleContent,
    formats: &[S],
    white_label: bool,
) -> Result<Bundle, ExportError> {
    let assembler = DEFAULT_ASSEMBLER.as_ref().map_err(Clone::clone)?;
    assembler.generate(content, formats, &RenderOptions::new().white_label(white_label))
}
