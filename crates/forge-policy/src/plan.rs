//! Plan tiers and the entitlements they grant
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Creator,
    Pro,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Creator => "creator",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    /// Display name used in upgrade messages
    pub fn title(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Creator => "Creator",
            PlanTier::Pro => "Pro",
            PlanTier::Enterprise => "Enterprise",
        }
    }

    /// Parse a plan name; anything unrecognised is `Free`
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "creator" => PlanTier::Creator,
            "pro" => PlanTier::Pro,
            "enterprise" => PlanTier::Enterprise,
            _ => PlanTier::Free,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Export permissions of one caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    pub plan: PlanTier,
    pub can_export_json: bool,
    pub can_export_pdf: bool,
    pub can_export_bundle_zip: bool,
    /// Trial callers get watermarked exports
    pub is_trial: bool,
}

impl Entitlements {
    pub fn for_plan(plan: PlanTier) -> Self {
        Self {
            plan,
            can_export_json: plan >= PlanTier::Creator,
            can_export_pdf: plan >= PlanTier::Pro,
            can_export_bundle_zip: plan == PlanTier::Enterprise,
            is_trial: false,
        }
    }

    pub fn trial(mut self, is_trial: bool) -> Self {
        self.is_trial = is_trial;
        self
    }
}

impl Default for Entitlements {
    fn default() -> Self {
        Self::for_plan(PlanTier::Free)
    }
}
