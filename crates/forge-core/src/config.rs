//! Export engine configuration
//!
//! Loaded from YAML; every field has a built-in default so a partial file
//! (or no file at all) is valid.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::{DEFAULT_READINESS_THRESHOLD, MANIFEST_VERSION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Version stamped into `manifest.json`
    pub manifest_version: String,

    /// Compliance notice carried by every manifest and JSON export.
    /// Must not mention a brand term: it survives white-label mode.
    pub license_notice: String,

    // === Branding ===

    /// Attribution line rendered at the end of textual exports
    pub attribution: String,

    /// Brand names removed in white-label mode (matched case-insensitively)
    pub brand_terms: Vec<String>,

    /// Replacement for brand attributions in white-label mode
    pub white_label_phrase: String,

    /// Replacement for any other brand mention in white-label mode
    pub white_label_name: String,

    /// Watermark applied to exports made by trial users
    pub trial_watermark: String,

    // === Bundling ===

    /// Content formats packed when `zip` is requested on its own
    pub zip_default_formats: Vec<ExportFormat>,

    /// Minimum composite score required to export
    pub readiness_threshold: u32,

    /// Optional path to a YAML templates file replacing the built-in templates
    pub templates_path: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            manifest_version: MANIFEST_VERSION.to_string(),
            license_notice: "Licensed for use under the terms of your subscription agreement. \
                             Redistribution is subject to your plan entitlements."
                .to_string(),
            attribution: "Generated by PromptForge v3".to_string(),
            brand_terms: vec!["PromptForge".to_string(), "ChatGPT Prompting".to_string()],
            white_label_phrase: "Generated by AI Prompt Engineering Platform".to_string(),
            white_label_name: "AI Prompt Engineering Platform".to_string(),
            trial_watermark: "TRIAL EXPORT - NOT FOR COMMERCIAL USE".to_string(),
            zip_default_formats: vec![ExportFormat::Txt, ExportFormat::Md, ExportFormat::Json],
            readiness_threshold: DEFAULT_READINESS_THRESHOLD,
            templates_path: None,
        }
    }
}

impl ExportConfig {
    /// Parse and validate a config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ExportError> {
        let config: ExportConfig =
            serde_yaml::from_str(yaml).map_err(|e| ExportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &str) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExportError::Config(format!("Failed to read config file {}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.zip_default_formats.is_empty() {
            return Err(ExportError::Config("zip_default_formats is empty".to_string()));
        }
        if let Some(format) = self.zip_default_formats.iter().find(|f| !f.is_content()) {
            return Err(ExportError::Config(format!(
                "zip_default_formats may only list content formats, found {}",
                format
            )));
        }
        if self.brand_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(ExportError::Config("brand_terms contains an empty entry".to_string()));
        }

        for (field, value) in [
            ("license_notice", &self.license_notice),
            ("white_label_phrase", &self.white_label_phrase),
            ("white_label_name", &self.white_label_name),
        ] {
            if let Some(term) = self.brand_term_in(value) {
                return Err(ExportError::Config(format!(
                    "{} must not mention brand term '{}'",
                    field, term
                )));
            }
        }

        // white-label replacements are spliced into serialized JSON
        for (field, value) in [
            ("white_label_phrase", &self.white_label_phrase),
            ("white_label_name", &self.white_label_name),
        ] {
            if let Some(c) = value.chars().find(|&c| matches!(c, '"' | '\\') || c.is_control()) {
                return Err(ExportError::Config(format!(
                    "{} must not contain {:?}",
                    field, c
                )));
            }
        }
        Ok(())
    }

    fn brand_term_in(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.brand_terms
            .iter()
            .find(|t| text.contains(&t.to_lowercase()))
            .map(String::as_str)
    }
}
