//! Template loading for the text-based export formats.
//!
//! Templates live in a YAML file with named Handlebars templates. The
//! built-in set is compiled into the crate; a replacement file can be
//! supplied through `ExportConfig::templates_path`.

use serde::Deserialize;
use std::collections::HashMap;

/// Built-in templates shipped with the crate
pub const BUILTIN_TEMPLATES: &str = include_str!("../templates/export-templates.yaml");

/// Template names every templates file must define
pub const REQUIRED_TEMPLATES: [&str; 2] = ["txt", "md"];

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// The templates compiled into the crate
    pub fn builtin() -> Result<Self, String> {
        Self::from_yaml(BUILTIN_TEMPLATES)
    }

    /// Load templates from a YAML file
    pub fn load(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read templates file: {}", e))?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content and check the required names exist
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let file: TemplatesFile = serde_yaml::from_str(yaml)
            .map_err(|e| format!("Failed to parse templates YAML: {}", e))?;

        if let Some(missing) = REQUIRED_TEMPLATES
            .iter()
            .find(|name| !file.templates.contains_key(**name))
        {
            return Err(format!("Templates file is missing the '{}' template", missing));
        }

        Ok(file)
    }
}
