//! Prometheus registry for the export service.
use forge_core::ExportFormat;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ExportMetrics {
    registry: Registry,
    exports_total: IntCounterVec,
    failures_total: IntCounterVec,
    bundle_bytes: Histogram,
}

impl ExportMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let exports_total = IntCounterVec::new(
            Opts::new("forge_exports_total", "Exported files by format"),
            &["format"],
        )?;
        let failures_total = IntCounterVec::new(
            Opts::new("forge_export_failures_total", "Rejected or failed export requests by kind"),
            &["kind"],
        )?;
        let bundle_bytes = Histogram::with_opts(
            HistogramOpts::new("forge_bundle_bytes", "Total size of generated bundles in bytes")
                .buckets(prometheus::exponential_buckets(1024.0, 4.0, 8)?),
        )?;

        registry.register(Box::new(exports_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(bundle_bytes.clone()))?;

        Ok(Self {
            registry,
            exports_total,
            failures_total,
            bundle_bytes,
        })
    }

    pub fn record_export(&self, formats: &[ExportFormat], bytes: usize) {
        for format in formats {
            self.exports_total.with_label_values(&[format.as_str()]).inc();
        }
        self.bundle_bytes.observe(bytes as f64);
    }

    pub fn record_failure(&self, kind: &str) {
        self.failures_total.with_label_values(&[kind]).inc();
    }

    /// Text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_exposed() {
        let metrics = ExportMetrics::new().unwrap();
        metrics.record_export(&[ExportFormat::Txt, ExportFormat::Zip], 2048);
        metrics.record_failure("unsupported_format");

        let text = metrics.encode().unwrap();
        assert!(text.contains("forge_exports_total{format=\"txt\"} 1"));
        assert!(text.contains("forge_exports_total{format=\"zip\"} 1"));
        assert!(text.contains("forge_export_failures_total{kind=\"unsupported_format\"} 1"));
        assert!(text.contains("forge_bundle_bytes_count 1"));
    }
}
