//! Bundle orchestration: renderers, telemetry, manifest, listing, archive.
use forge_core::{parse_formats, BundleContent, ExportConfig, ExportError, ExportFormat, RenderOptions};
use forge_integrity::{checksum_listing, Manifest, ManifestBuilder, CHECKSUM_FILE, MANIFEST_FILE};
use forge_render::RendererSet;
use std::collections::BTreeMap;

use crate::archive::write_archive;
use crate::telemetry::{telemetry_json, TELEMETRY_FILE};

/// A finished export: named files, the manifest describing them and the
/// bundle checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub files: BTreeMap<String, Vec<u8>>,
    pub manifest: Manifest,
    pub bundle_checksum: String,
}

impl Bundle {
    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Name of the archive when the bundle was packed into one
    pub fn archive_name(&self) -> Option<&str> {
        match self.files.keys().next() {
            Some(name) if self.files.len() == 1 && name.ends_with(".zip") => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Stateless export service. Holds only the config and the renderers built
/// from it; every call to [`BundleAssembler::generate`] is independent.
pub struct BundleAssembler {
    config: ExportConfig,
    renderers: RendererSet,
}

impl BundleAssembler {
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        config.validate()?;
        let renderers = RendererSet::from_config(&config)?;
        Ok(Self { config, renderers })
    }

    /// Assembler over the built-in config
    pub fn builtin() -> Result<Self, ExportError> {
        Self::new(ExportConfig::default())
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn renderers(&self) -> &RendererSet {
        &self.renderers
    }

    /// Parse caller format tokens and build the bundle
    pub fn generate<S: AsRef<str>>(
        &self,
        content: &BundleContent,
        formats: &[S],
        options: &RenderOptions,
    ) -> Result<Bundle, ExportError> {
        let formats = parse_formats(formats)?;
        self.generate_formats(content, &formats, options)
    }

    /// Build the bundle for already-parsed formats. All or nothing: the
    /// first failure aborts the whole bundle.
    pub fn generate_formats(
        &self,
        content: &BundleContent,
        formats: &[ExportFormat],
        options: &RenderOptions,
    ) -> Result<Bundle, ExportError> {
        if formats.is_empty() {
            return Err(ExportError::NoFormats);
        }
        content.validate()?;

        let archive = formats.contains(&ExportFormat::Zip);
        let mut content_formats: Vec<ExportFormat> =
            formats.iter().copied().filter(ExportFormat::is_content).collect();
        if content_formats.is_empty() {
            content_formats = self.config.zip_default_formats.clone();
        }

        let mut files = BTreeMap::new();
        for format in &content_formats {
            let file = self.renderers.render(*format, content, options)?;
            files.insert(file.name, file.bytes);
        }

        if let Some(telemetry) = telemetry_json(content)? {
            files.insert(TELEMETRY_FILE.to_string(), self.finish(telemetry, options).into_bytes());
        }

        let mut manifest_formats = content_formats;
        if archive {
            manifest_formats.push(ExportFormat::Zip);
        }

        let manifest = files
            .iter()
            .fold(
                ManifestBuilder::with_config(content, &self.config).formats(&manifest_formats),
                |builder, (name, bytes)| builder.file(name.clone(), bytes),
            )
            .build();

        let manifest_json = self.finish(manifest.to_json()?, options);
        // keep the returned manifest identical to manifest.json
        let manifest = if options.white_label {
            Manifest::from_json(manifest_json.as_bytes())?
        } else {
            manifest
        };
        let listing = self.finish(checksum_listing(&manifest), options);

        files.insert(MANIFEST_FILE.to_string(), manifest_json.into_bytes());
        files.insert(CHECKSUM_FILE.to_string(), listing.into_bytes());

        if archive {
            let bytes = write_archive(&files)?;
            files = BTreeMap::from([(format!("bundle_{}.zip", manifest.bundle_id), bytes)]);
        }

        let bundle = Bundle {
            bundle_checksum: manifest.checksums.bundle.clone(),
            manifest,
            files,
        };

        tracing::info!(
            run_id = %content.metadata.run_id,
            bundle_id = %bundle.manifest.bundle_id,
            files = bundle.files.len(),
            bytes = bundle.total_bytes(),
            archive,
            white_label = options.white_label,
            "bundle generated"
        );

        Ok(bundle)
    }

    fn finish(&self, text: String, options: &RenderOptions) -> String {
        if options.white_label {
            self.renderers.branding().apply(&text)
        } else {
            text
        }
    }
}
