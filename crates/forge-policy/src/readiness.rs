//! Readiness gate: a prompt must score high enough before it can be exported.
pub use forge_core::DEFAULT_READINESS_THRESHOLD;
use forge_core::Scores;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessCheck {
    pub ready: bool,
    pub score: Option<u32>,
    pub threshold: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Unscored runs pass; scored runs need `composite >= threshold`.
pub fn check_readiness(scores: Option<&Scores>, threshold: u32) -> ReadinessCheck {
    let score = scores.map(|s| s.composite);
    let ready = score.map_or(true, |s| s >= threshold);

    ReadinessCheck {
        ready,
        score,
        threshold,
        reason: match score {
            Some(s) if !ready => Some(format!(
                "Composite score {} is below the export threshold of {}. Improve the prompt before exporting.",
                s, threshold
            )),
            _ => None,
        },
    }
}
