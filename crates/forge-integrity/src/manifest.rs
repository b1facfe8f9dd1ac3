//! Bundle manifest.
use chrono::{DateTime, Utc};
use forge_core::{BundleContent, ExportConfig, ExportError, ExportFormat, MANIFEST_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::checksum::{bundle_checksum, sha256_hex};
use crate::BUNDLE_ID_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub bundle_id: String,
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub formats: Vec<ExportFormat>,
    pub files: Vec<FileEntry>,
    pub checksums: Checksums,
    pub metadata: ManifestMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub individual: BTreeMap<String, String>,
    pub bundle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub module_id: Option<String>,
    pub seven_d_signature: String,
    pub score_total: Option<u32>,
    pub license_notice: String,
}

impl Manifest {
    /// Pretty JSON, as stored in `manifest.json`
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ExportError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn bundle_checksum(&self) -> &str {
        &self.checksums.bundle
    }
}

/// Collects the checksummed files of one bundle and produces its manifest.
///
/// ```ignore
/// let manifest = ManifestBuilder::new(&content)
///     .formats(&[ExportFormat::Txt])
///     .file("prompt.txt", &txt)
///     .build();
/// ```
pub struct ManifestBuilder<'a> {
    content: &'a BundleContent,
    version: String,
    license_notice: String,
    formats: Vec<ExportFormat>,
    files: BTreeMap<String, &'a [u8]>,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(content: &'a BundleContent) -> Self {
        Self {
            content,
            version: MANIFEST_VERSION.to_string(),
            license_notice: ExportConfig::default().license_notice,
            formats: Vec::new(),
            files: BTreeMap::new(),
        }
    }

    /// Version and license notice from config
    pub fn with_config(content: &'a BundleContent, config: &ExportConfig) -> Self {
        Self::new(content)
            .version(config.manifest_version.clone())
            .license_notice(config.license_notice.clone())
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn license_notice(mut self, notice: impl Into<String>) -> Self {
        self.license_notice = notice.into();
        self
    }

    pub fn formats(mut self, formats: &[ExportFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    /// Add a file to the checksummed set. A later file with the same name
    /// replaces the earlier one.
    pub fn file(mut self, name: impl Into<String>, bytes: &'a [u8]) -> Self {
        self.files.insert(name.into(), bytes);
        self
    }

    pub fn build(self) -> Manifest {
        let bundle = bundle_checksum(self.files.iter().map(|(name, bytes)| (name.as_str(), *bytes)));

        let files: Vec<FileEntry> = self
            .files
            .iter()
            .map(|(name, bytes)| FileEntry {
                name: name.clone(),
                size: bytes.len() as u64,
                checksum: sha256_hex(bytes),
            })
            .collect();

        let individual = files
            .iter()
            .map(|f| (f.name.clone(), f.checksum.clone()))
            .collect();

        let meta = &self.content.metadata;
        Manifest {
            version: self.version,
            bundle_id: bundle[..BUNDLE_ID_LEN].to_string(),
            run_id: meta.run_id.clone(),
            created_at: meta.created_at,
            formats: self.formats,
            files,
            checksums: Checksums { individual, bundle },
            metadata: ManifestMetadata {
                module_id: meta.module_id.clone(),
                seven_d_signature: self.content.seven_d.effective_signature(),
                score_total: self.content.score_total(),
                license_notice: self.license_notice,
            },
        }
    }
}
