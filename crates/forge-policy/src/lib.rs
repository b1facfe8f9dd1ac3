//! Forge Policy: who may export what
//!
//! Gating happens in the calling layer, before the bundle assembler runs.
//! The assembler itself never consults entitlements.
//!
//! # Architecture
//!
//! ```text
//! plan → Entitlements → check_export_entitlements (per format) → ExportRequestDecision
//! scores ──────────────→ check_readiness ─────────────────────→ ReadinessCheck
//! ```
//!
//! # Example
//!
//! ```
//! use forge_core::ExportFormat;
//! use forge_policy::{check_export_entitlements, Entitlements, PlanTier};
//!
//! let entitlements = Entitlements::for_plan(PlanTier::from_str_lossy("creator"));
//! let check = check_export_entitlements(ExportFormat::Pdf, &entitlements);
//!
//! assert!(!check.allowed);
//! assert_eq!(check.required_plan, PlanTier::Pro);
//! ```

pub mod entitlement;
pub mod plan;
pub mod readiness;

pub use entitlement::{
    check_export_entitlements, required_plan, upgrade_recommendation, validate_export_request, EntitlementCheck,
    ExportRequestDecision,
};
pub use plan::{Entitlements, PlanTier};
pub use readiness::{check_readiness, ReadinessCheck, DEFAULT_READINESS_THRESHOLD};
