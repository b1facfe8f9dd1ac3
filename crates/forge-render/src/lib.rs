//! Forge Render: BundleContent to export formats
//!
//! One [`FormatRenderer`] per content format. txt and md are Handlebars
//! templates, json is serialized with serde_json, and pdf lays the txt
//! rendering out on PDF pages. Every renderer is pure: same content and
//! options in, same bytes out.
//!
//! # Example
//!
//! ```ignore
//! use forge_core::{ExportFormat, RenderOptions};
//! use forge_render::RendererSet;
//!
//! let renderers = RendererSet::builtin()?;
//! let file = renderers.render(ExportFormat::Txt, &content, &RenderOptions::new())?;
//! assert_eq!(file.name, "prompt.txt");
//! ```

pub mod branding;
pub mod json;
pub mod pdf;
pub mod renderer;
pub mod templates;
pub mod text;

pub use branding::Branding;
pub use json::JsonRenderer;
pub use pdf::PdfRenderer;
pub use text::{MarkdownRenderer, TxtRenderer};

use forge_core::{BundleContent, ExportConfig, ExportError, ExportFormat, RenderOptions};
use renderer::TemplateRenderer;
use std::collections::BTreeMap;
use std::sync::Arc;
use templates::TemplatesFile;

/// A renderer for one content format
pub trait FormatRenderer: Send + Sync {
    /// Format this renderer produces
    fn format(&self) -> ExportFormat;

    /// Render the content to the bytes of the exported file
    fn render(&self, content: &BundleContent, options: &RenderOptions) -> Result<Vec<u8>, ExportError>;
}

/// A rendered export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Everything the renderers share: compiled templates, branding and the
/// fixed strings stamped into exports.
pub struct RenderEnv {
    pub(crate) templates: TemplateRenderer,
    pub(crate) branding: Branding,
    pub(crate) attribution: String,
    pub(crate) license_notice: String,
}

impl RenderEnv {
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        let templates = match &config.templates_path {
            Some(path) => TemplatesFile::load(path),
            None => TemplatesFile::builtin(),
        }
        .map_err(ExportError::Config)?;

        Ok(Self {
            templates: TemplateRenderer::new(&templates).map_err(ExportError::Config)?,
            branding: Branding::from_config(config)?,
            attribution: config.attribution.clone(),
            license_notice: config.license_notice.clone(),
        })
    }

    /// Final pass over every textual output
    pub(crate) fn finish(&self, text: String, options: &RenderOptions) -> String {
        if options.white_label {
            self.branding.apply(&text)
        } else {
            text
        }
    }
}

/// The renderers for all content formats
pub struct RendererSet {
    env: Arc<RenderEnv>,
    renderers: BTreeMap<ExportFormat, Box<dyn FormatRenderer>>,
}

impl RendererSet {
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        let env = Arc::new(RenderEnv::from_config(config)?);

        let renderers: Vec<Box<dyn FormatRenderer>> = vec![
            Box::new(TxtRenderer::new(env.clone())),
            Box::new(MarkdownRenderer::new(env.clone())),
            Box::new(JsonRenderer::new(env.clone())),
            Box::new(PdfRenderer::new(env.clone())),
        ];

        Ok(Self {
            env,
            renderers: renderers.into_iter().map(|r| (r.format(), r)).collect(),
        })
    }

    /// Renderers built from the default config
    pub fn builtin() -> Result<Self, ExportError> {
        Self::from_config(&ExportConfig::default())
    }

    pub fn branding(&self) -> &Branding {
        &self.env.branding
    }

    /// Content formats this set can render
    pub fn formats(&self) -> Vec<ExportFormat> {
        self.renderers.keys().copied().collect()
    }

    /// Render one content format into its named file
    pub fn render(
        &self,
        format: ExportFormat,
        content: &BundleContent,
        options: &RenderOptions,
    ) -> Result<RenderedFile, ExportError> {
        let (renderer, name) = match (self.renderers.get(&format), format.file_name()) {
            (Some(renderer), Some(name)) => (renderer, name),
            _ => {
                return Err(ExportError::render(
                    format,
                    "not a content format; archives are built by the bundle assembler",
                ))
            }
        };

        let bytes = renderer.render(content, options)?;
        tracing::debug!(format = %format, bytes = bytes.len(), "rendered export file");

        Ok(RenderedFile {
            name: name.to_string(),
            bytes,
            mime_type: format.mime_type(),
        })
    }
}
