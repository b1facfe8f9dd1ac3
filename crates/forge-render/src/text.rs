//! Template-backed renderers: plain text and Markdown.

use forge_core::{BundleContent, ExportError, ExportFormat, RenderOptions};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{FormatRenderer, RenderEnv};

/// Data handed to the txt and md templates
pub(crate) fn template_data(content: &BundleContent, options: &RenderOptions, attribution: &str) -> Value {
    let seven_d: Vec<Value> = content
        .seven_d
        .fields()
        .iter()
        .map(|(label, value)| json!({ "label": label, "value": value }))
        .collect();

    let scores: Option<Vec<Value>> = content.scores.map(|scores| {
        scores
            .fields()
            .iter()
            .map(|(label, value)| json!({ "label": label, "value": value }))
            .collect()
    });

    json!({
        "prompt": content.prompt,
        "fence": code_fence(&content.prompt),
        "seven_d": seven_d,
        "signature": content.seven_d.effective_signature(),
        "scores": scores,
        "watermark": options.watermark,
        "run_id": content.metadata.run_id,
        "module_id": content.metadata.module_id,
        "attribution": attribution,
    })
}

/// A backtick fence longer than any backtick run inside `text`.
fn code_fence(text: &str) -> String {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

pub struct TxtRenderer {
    env: Arc<RenderEnv>,
}

impl TxtRenderer {
    pub fn new(env: Arc<RenderEnv>) -> Self {
        Self { env }
    }

    /// The finished text, white-label pass included
    pub fn render_text(&self, content: &BundleContent, options: &RenderOptions) -> Result<String, ExportError> {
        let data = template_data(content, options, &self.env.attribution);
        let text = self
            .env
            .templates
            .render("txt", &data)
            .map_err(|e| ExportError::render(ExportFormat::Txt, e))?;
        Ok(self.env.finish(text, options))
    }
}

impl FormatRenderer for TxtRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Txt
    }

    fn render(&self, content: &BundleContent, options: &RenderOptions) -> Result<Vec<u8>, ExportError> {
        self.render_text(content, options).map(String::into_bytes)
    }
}

pub struct MarkdownRenderer {
    env: Arc<RenderEnv>,
}

impl MarkdownRenderer {
    pub fn new(env: Arc<RenderEnv>) -> Self {
        Self { env }
    }
}

impl FormatRenderer for MarkdownRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Md
    }

    fn render(&self, content: &BundleContent, options: &RenderOptions) -> Result<Vec<u8>, ExportError> {
        let data = template_data(content, options, &self.env.attribution);
        let text = self
            .env
            .templates
            .render("md", &data)
            .map_err(|e| ExportError::render(ExportFormat::Md, e))?;
        Ok(self.env.finish(text, options).into_bytes())
    }
}
