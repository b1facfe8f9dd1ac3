//! White-label branding.
//!
//! Attribution phrases ("Generated by PromptForge v3") become the configured
//! white-label phrase; any other brand mention becomes the generic product
//! name. Matching is case-insensitive and also swallows a trailing trademark
//! sign and version suffix.

use forge_core::{ExportConfig, ExportError};
use regex::Regex;

/// Upper bound on replacement passes. One pass is enough unless a
/// replacement, joined with its surroundings, forms a new brand mention.
const MAX_PASSES: usize = 8;

#[derive(Debug, Clone)]
pub struct Branding {
    attribution: Regex,
    mention: Regex,
    phrase: String,
    name: String,
}

impl Branding {
    pub fn new(terms: &[String], phrase: &str, name: &str) -> Result<Self, ExportError> {
        let mut terms: Vec<&str> = terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
        if terms.is_empty() {
            return Err(ExportError::Config("no brand terms configured".to_string()));
        }
        // longest first so "PromptForge Pro" wins over "PromptForge"
        terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        let suffix = r"(?:\s*™)?(?:\s+v\d+(?:\.\d+)*)?";

        let attribution = Regex::new(&format!(r"(?i)generated\s+by\s+(?:{}){}", alternation, suffix))
            .map_err(|e| ExportError::Config(e.to_string()))?;
        let mention = Regex::new(&format!(r"(?i)(?:{}){}", alternation, suffix))
            .map_err(|e| ExportError::Config(e.to_string()))?;

        Ok(Self {
            attribution,
            mention,
            phrase: phrase.to_string(),
            name: name.to_string(),
        })
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        Self::new(&config.brand_terms, &config.white_label_phrase, &config.white_label_name)
    }

    /// Whether the text still mentions a brand term
    pub fn mentions_brand(&self, text: &str) -> bool {
        self.mention.is_match(text)
    }

    /// Replace every brand mention in `text`
    pub fn apply(&self, text: &str) -> String {
        let mut out = self
            .attribution
            .replace_all(text, regex::NoExpand(&self.phrase))
            .into_owned();

        for _ in 0..MAX_PASSES {
            if !self.mention.is_match(&out) {
                break;
            }
            out = self
                .mention
                .replace_all(&out, regex::NoExpand(&self.name))
                .into_owned();
        }
        out
    }
}
