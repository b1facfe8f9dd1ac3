//! `telemetry.json`
use forge_core::{BundleContent, ExportError, Scores, Telemetry};
use serde::Serialize;

pub const TELEMETRY_FILE: &str = "telemetry.json";

#[derive(Debug, Serialize)]
struct TelemetryFile<'a> {
    run_id: &'a str,
    module_id: Option<&'a str>,
    performance: &'a Telemetry,
    scores: Option<&'a Scores>,
}

/// Pretty JSON for the run's telemetry, or `None` when the run carries none
pub fn telemetry_json(content: &BundleContent) -> Result<Option<String>, ExportError> {
    let Some(performance) = &content.telemetry else {
        return Ok(None);
    };

    let file = TelemetryFile {
        run_id: &content.metadata.run_id,
        module_id: content.metadata.module_id.as_deref(),
        performance,
        scores: content.scores.as_ref(),
    };
    Ok(Some(serde_json::to_string_pretty(&file)?))
}
