//! JSON export.

use chrono::{DateTime, Utc};
use forge_core::{BundleContent, ExportError, ExportFormat, RenderOptions, Scores, SevenDConfig};
use serde::Serialize;
use std::sync::Arc;

use crate::{FormatRenderer, RenderEnv};

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    prompt: &'a str,
    seven_d: &'a SevenDConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<&'a Scores>,
    metadata: JsonMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct JsonMetadata<'a> {
    run_id: &'a str,
    module_id: Option<&'a str>,
    org_id: &'a str,
    user_id: &'a str,
    created_at: &'a DateTime<Utc>,
    version: &'a str,
    license_notice: &'a str,
    generated_by: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    watermark: Option<&'a str>,
}

pub struct JsonRenderer {
    env: Arc<RenderEnv>,
}

impl JsonRenderer {
    pub fn new(env: Arc<RenderEnv>) -> Self {
        Self { env }
    }
}

impl FormatRenderer for JsonRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, content: &BundleContent, options: &RenderOptions) -> Result<Vec<u8>, ExportError> {
        let meta = &content.metadata;
        let export = JsonExport {
            prompt: &content.prompt,
            seven_d: &content.seven_d,
            scores: content.scores.as_ref(),
            metadata: JsonMetadata {
                run_id: &meta.run_id,
                module_id: meta.module_id.as_deref(),
                org_id: &meta.org_id,
                user_id: &meta.user_id,
                created_at: &meta.created_at,
                version: &meta.version,
                license_notice: &self.env.license_notice,
                generated_by: &self.env.attribution,
                watermark: options.watermark.as_deref(),
            },
        };

        let text = serde_json::to_string_pretty(&export)
            .map_err(|e| ExportError::render(ExportFormat::Json, e.to_string()))?;
        Ok(self.env.finish(text, options).into_bytes())
    }
}
