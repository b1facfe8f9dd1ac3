//! Export entitlement checks
//!
//! Provides per-format allow/deny decisions with upgrade recommendations.

use forge_core::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::{Entitlements, PlanTier};

/// Result of checking one format against a caller's entitlements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementCheck {
    pub format: ExportFormat,
    pub allowed: bool,
    /// Why the format is denied, with the upgrade that unlocks it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub current_plan: PlanTier,
    pub required_plan: PlanTier,
}

impl fmt::Display for EntitlementCheck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.allowed {
            write!(f, "ALLOW: {}", self.format)
        } else {
            write!(f, "DENY: {}", self.reason.as_deref().unwrap_or("not entitled"))
        }
    }
}

/// Lowest plan that may export `format`
pub fn required_plan(format: ExportFormat) -> PlanTier {
    match format {
        ExportFormat::Txt | ExportFormat::Md => PlanTier::Free,
        ExportFormat::Json => PlanTier::Creator,
        ExportFormat::Pdf => PlanTier::Pro,
        ExportFormat::Zip => PlanTier::Enterprise,
    }
}

/// Upgrade message for a plan that lacks `format`
pub fn upgrade_recommendation(current: PlanTier, format: ExportFormat) -> String {
    let required = required_plan(format);
    if current >= required {
        return "Upgrade your plan to access this feature".to_string();
    }
    match format {
        ExportFormat::Zip => "Upgrade to Enterprise for bundle export".to_string(),
        _ => format!(
            "Upgrade to {} plan for {} export",
            required.title(),
            format.as_str().to_ascii_uppercase()
        ),
    }
}

/// Whether the entitlements cover `format`
pub fn check_export_entitlements(format: ExportFormat, entitlements: &Entitlements) -> EntitlementCheck {
    let allowed = match format {
        ExportFormat::Txt | ExportFormat::Md => true,
        ExportFormat::Json => entitlements.can_export_json,
        ExportFormat::Pdf => entitlements.can_export_pdf,
        ExportFormat::Zip => entitlements.can_export_bundle_zip,
    };

    let required = required_plan(format);
    let reason = (!allowed).then(|| {
        format!(
            "{} export requires {} plan or higher. {}",
            format.as_str().to_ascii_uppercase(),
            required,
            upgrade_recommendation(entitlements.plan, format)
        )
    });

    EntitlementCheck {
        format,
        allowed,
        reason,
        current_plan: entitlements.plan,
        required_plan: if allowed { entitlements.plan } else { required },
    }
}

/// Per-format partition of an export request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequestDecision {
    pub allowed: Vec<ExportFormat>,
    pub denied: Vec<EntitlementCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExportRequestDecision {
    /// Nothing was denied
    pub fn is_allowed(&self) -> bool {
        self.denied.is_empty()
    }

    /// Highest plan any denied format needs
    pub fn required_plan(&self) -> Option<PlanTier> {
        self.denied.iter().map(|c| c.required_plan).max()
    }
}

/// Check every requested format; the request passes only if all do
pub fn validate_export_request(formats: &[ExportFormat], entitlements: &Entitlements) -> ExportRequestDecision {
    let (allowed, denied): (Vec<EntitlementCheck>, Vec<EntitlementCheck>) = formats
        .iter()
        .map(|f| check_export_entitlements(*f, entitlements))
        .partition(|c| c.allowed);

    let reason = if denied.is_empty() {
        None
    } else {
        let names: Vec<&str> = denied.iter().map(|c| c.format.as_str()).collect();
        tracing::debug!(plan = %entitlements.plan, denied = ?names, "export request denied");
        Some(format!(
            "Formats not available on the {} plan: {}. {}",
            entitlements.plan,
            names.join(", "),
            denied.iter().filter_map(|c| c.reason.as_deref()).collect::<Vec<_>>().join(" ")
        ))
    };

    ExportRequestDecision {
        allowed: allowed.into_iter().map(|c| c.format).collect(),
        denied,
        reason,
    }
}
