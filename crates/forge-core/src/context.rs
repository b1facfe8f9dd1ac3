//! Render options shared by every renderer during one export.

/// Per-request rendering switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Strip brand names from every emitted file
    pub white_label: bool,
    /// Watermark text for trial exports
    pub watermark: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn white_label(mut self, enabled: bool) -> Self {
        self.white_label = enabled;
        self
    }

    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }
}
