//! NAPI bindings for export entitlements

use forge_core::ExportFormat;
use forge_policy::{check_export_entitlements, Entitlements, PlanTier};
use napi::bindgen_prelude::*;

#[napi(object)]
pub struct EntitlementResult {
    pub allowed: bool,
    pub reason: Option<String>,
    pub current_plan: String,
    pub required_plan: String,
}

/// Whether `plan` may export `format`
#[napi]
pub fn check_export_entitlement(format: String, plan: String) -> Result<EntitlementResult> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: forge_core::ExportError| Error::new(Status::InvalidArg, e.to_string()))?;

    let check = check_export_entitlements(format, &Entitlements::for_plan(PlanTier::from_str_lossy(&plan)));
    Ok(EntitlementResult {
        allowed: check.allowed,
        reason: check.reason,
        current_plan: check.current_plan.to_string(),
        required_plan: check.required_plan.to_string(),
    })
}

/// Formats `plan` may export
#[napi]
pub fn allowed_formats(plan: String) -> Vec<String> {
    let entitlements = Entitlements::for_plan(PlanTier::from_str_lossy(&plan));
    ExportFormat::ALL
        .iter()
        .filter(|f| check_export_entitlements(**f, &entitlements).allowed)
        .map(|f| f.as_str().to_string())
        .collect()
}
