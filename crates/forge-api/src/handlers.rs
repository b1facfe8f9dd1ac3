//! API Handlers
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use forge_core::{parse_formats, BundleContent, ExportError, ExportFormat, RenderOptions};
use forge_integrity::Manifest;
use forge_policy::{
    check_export_entitlements, check_readiness, validate_export_request, EntitlementCheck, Entitlements, PlanTier,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub content: BundleContent,
    pub formats: Vec<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub trial: bool,
    #[serde(default)]
    pub white_label: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub bundle_checksum: String,
    pub manifest: Manifest,
    /// File name to base64 bytes
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct FormatsQuery {
    pub plan: Option<String>,
}

/// Error response with a JSON body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error, "message": message.into() }),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.body {
            map.insert(key.to_string(), value);
        }
        self
    }

    fn kind(&self) -> &str {
        self.body["error"].as_str().unwrap_or("internal")
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ApiError::new(status, err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, ApiError> {
    let run_id = req.content.metadata.run_id.clone();
    let result = generate(&state, req).await;
    if let Err(err) = &result {
        state.metrics.record_failure(err.kind());
        tracing::warn!(run_id = %run_id, status = %err.status, error = err.kind(), "export rejected");
    }
    result.map(Json)
}

async fn generate(state: &AppState, req: ExportRequest) -> Result<ExportResponse, ApiError> {
    let formats = parse_formats(req.formats.as_slice())?;

    let plan = PlanTier::from_str_lossy(req.plan.as_deref().unwrap_or_default());
    let entitlements = Entitlements::for_plan(plan).trial(req.trial);

    let decision = validate_export_request(&formats, &entitlements);
    if !decision.is_allowed() {
        let required = decision.required_plan().unwrap_or(plan);
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "entitlement_denied",
            decision.reason.clone().unwrap_or_default(),
        )
        .with("current_plan", json!(plan))
        .with("required_plan", json!(required))
        .with("denied", json!(decision.denied)));
    }

    let config = state.assembler.config();
    let readiness = check_readiness(req.content.scores.as_ref(), config.readiness_threshold);
    if !readiness.ready {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "not_ready",
            readiness.reason.clone().unwrap_or_default(),
        )
        .with("score", json!(readiness.score))
        .with("threshold", json!(readiness.threshold)));
    }

    let mut options = RenderOptions::new().white_label(req.white_label);
    if entitlements.is_trial {
        options = options.with_watermark(config.trial_watermark.clone());
    }

    let assembler = state.assembler.clone();
    let content = req.content;
    let requested = formats.clone();
    let bundle = tokio::task::spawn_blocking(move || assembler.generate_formats(&content, &requested, &options))
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string()))??;

    state.metrics.record_export(&bundle.manifest.formats, bundle.total_bytes());

    Ok(ExportResponse {
        bundle_checksum: bundle.bundle_checksum,
        files: bundle
            .files
            .iter()
            .map(|(name, bytes)| (name.clone(), STANDARD.encode(bytes)))
            .collect(),
        manifest: bundle.manifest,
    })
}

/// Per-format entitlement checks for a plan
pub async fn formats(Query(query): Query<FormatsQuery>) -> Json<Value> {
    let plan = PlanTier::from_str_lossy(query.plan.as_deref().unwrap_or_default());
    let entitlements = Entitlements::for_plan(plan);
    let checks: Vec<EntitlementCheck> = ExportFormat::ALL
        .iter()
        .map(|f| check_export_entitlements(*f, &entitlements))
        .collect();

    Json(json!({ "plan": plan, "formats": checks }))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(text) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(err) => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "metrics", err.to_string()).into_response(),
    }
}
