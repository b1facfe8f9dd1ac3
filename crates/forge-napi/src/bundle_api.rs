//! NAPI bindings for bundle generation

use forge_core::BundleContent;
use napi::bindgen_prelude::*;

/// One file of a generated bundle
#[napi(object)]
pub struct BundleFile {
    pub name: String,
    pub data: Buffer,
}

/// Result of generating a bundle
#[napi(object)]
pub struct BundleResult {
    pub bundle_checksum: String,
    pub manifest_json: String,
    pub files: Vec<BundleFile>,
}

/// Integrity check of an archive produced by `generateBundle`
#[napi(object)]
pub struct ArchiveReport {
    pub valid: bool,
    pub checksum_match: bool,
    pub corrupted_files: Vec<String>,
    pub missing_files: Vec<String>,
}

/// Render, checksum and package a prompt export
#[napi]
pub fn generate_bundle(content_json: String, formats: Vec<String>, white_label: Option<bool>) -> Result<BundleResult> {
    let content: BundleContent = serde_json::from_str(&content_json)
        .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid content JSON: {}", e)))?;

    let bundle = forge_bundle::generate_bundle(&content, formats.as_slice(), white_label.unwrap_or(false))
        .map_err(|e| Error::from_reason(e.to_string()))?;

    let manifest_json = bundle
        .manifest
        .to_json()
        .map_err(|e| Error::from_reason(e.to_string()))?;

    Ok(BundleResult {
        bundle_checksum: bundle.bundle_checksum,
        manifest_json,
        files: bundle
            .files
            .into_iter()
            .map(|(name, bytes)| BundleFile {
                name,
                data: bytes.into(),
            })
            .collect(),
    })
}

#[napi]
pub fn verify_archive(archive: Buffer) -> Result<ArchiveReport> {
    let report = forge_bundle::verify_archive(&archive).map_err(|e| Error::from_reason(e.to_string()))?;
    Ok(ArchiveReport {
        valid: report.valid,
        checksum_match: report.checksum_match,
        corrupted_files: report.corrupted_files,
        missing_files: report.missing_files,
    })
}
