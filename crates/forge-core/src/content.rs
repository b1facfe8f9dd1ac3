//! Data Model: BundleContent and its parts
//!
//! `BundleContent` is the single input of the export pipeline. JSON field
//! names follow the web client's payload (`sevenD`, `runId`, ...).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleContent {
    /// Generated prompt text
    pub prompt: String,
    /// 7D configuration the prompt was generated for
    #[serde(rename = "sevenD")]
    pub seven_d: SevenDConfig,
    /// Quality scores, when the prompt has been evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    pub metadata: RunMetadata,
    /// Generation telemetry, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Telemetry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevenDConfig {
    pub domain: String,
    pub scale: String,
    pub urgency: String,
    pub complexity: String,
    pub resources: String,
    pub application: String,
    pub output_format: String,
    #[serde(default)]
    pub signature_7d: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub clarity: u32,
    pub execution: u32,
    pub ambiguity: u32,
    pub business_fit: u32,
    pub composite: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub run_id: String,
    #[serde(default)]
    pub module_id: Option<String>,
    pub org_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub tokens_used: u64,
    pub duration_ms: u64,
    pub cost_usd: f64,
}

impl SevenDConfig {
    /// The seven dimensions as `(label, value)` pairs, in display order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("Domain", self.domain.as_str()),
            ("Scale", self.scale.as_str()),
            ("Urgency", self.urgency.as_str()),
            ("Complexity", self.complexity.as_str()),
            ("Resources", self.resources.as_str()),
            ("Application", self.application.as_str()),
            ("Output Format", self.output_format.as_str()),
        ]
    }

    /// The caller's signature, or one derived from the seven dimensions.
    pub fn effective_signature(&self) -> String {
        if !self.signature_7d.trim().is_empty() {
            return self.signature_7d.clone();
        }

        let pairs = [
            ("application", &self.application),
            ("complexity", &self.complexity),
            ("domain", &self.domain),
            ("output_format", &self.output_format),
            ("resources", &self.resources),
            ("scale", &self.scale),
            ("urgency", &self.urgency),
        ];
        let canonical = pairs
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect::<Vec<_>>()
            .join("|");

        let digest = hex::encode(Sha256::digest(canonical.as_bytes()));
        digest[..16].to_string()
    }
}

impl Scores {
    pub const MAX: u32 = 100;

    /// The five scores as `(label, value)` pairs, in display order.
    pub fn fields(&self) -> [(&'static str, u32); 5] {
        [
            ("Clarity", self.clarity),
            ("Execution", self.execution),
            ("Ambiguity", self.ambiguity),
            ("Business Fit", self.business_fit),
            ("Composite", self.composite),
        ]
    }
}

impl BundleContent {
    /// Reject content the renderers cannot faithfully represent.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.prompt.trim().is_empty() {
            return Err(ExportError::InvalidContent("prompt is empty".to_string()));
        }

        for (label, value) in self.seven_d.fields() {
            if value.trim().is_empty() {
                return Err(ExportError::InvalidContent(format!(
                    "7D field '{}' is empty",
                    label
                )));
            }
        }

        if let Some(scores) = &self.scores {
            for (label, value) in scores.fields() {
                if value > Scores::MAX {
                    return Err(ExportError::InvalidContent(format!(
                        "score '{}' is {} (max {})",
                        label,
                        value,
                        Scores::MAX
                    )));
                }
            }
        }

        if self.metadata.run_id.trim().is_empty() {
            return Err(ExportError::InvalidContent("runId is empty".to_string()));
        }

        Ok(())
    }

    /// Composite score, when scores are present.
    pub fn score_total(&self) -> Option<u32> {
        self.scores.map(|s| s.composite)
    }
}
