//! Bundle verification against its manifest.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::checksum::{bundle_checksum, sha256_hex};
use crate::manifest::Manifest;
use crate::BUNDLE_ID_LEN;

/// Outcome of checking a file set against a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub valid: bool,
    /// Recomputed bundle checksum equals the manifest's (and its bundle id)
    pub checksum_match: bool,
    /// Listed files whose bytes, size or recorded checksum disagree
    pub corrupted_files: Vec<String>,
    /// Listed files absent from the file set
    pub missing_files: Vec<String>,
}

/// Recompute every listed file's checksum and the bundle checksum.
///
/// Files in `files` that the manifest does not list (the manifest itself,
/// the checksum listing) are ignored.
pub fn verify_bundle(files: &BTreeMap<String, Vec<u8>>, manifest: &Manifest) -> IntegrityReport {
    let mut corrupted_files = Vec::new();
    let mut missing_files = Vec::new();
    let mut present = Vec::new();

    for entry in &manifest.files {
        let Some(bytes) = files.get(&entry.name) else {
            missing_files.push(entry.name.clone());
            continue;
        };
        present.push((entry.name.as_str(), bytes.as_slice()));

        let actual = sha256_hex(bytes);
        let recorded = manifest.checksums.individual.get(&entry.name);
        if actual != entry.checksum || recorded != Some(&entry.checksum) || bytes.len() as u64 != entry.size {
            corrupted_files.push(entry.name.clone());
        }
    }

    // individual checksums for files the file list forgot
    let listed = manifest.files.len() == manifest.checksums.individual.len();

    let checksum_match = missing_files.is_empty()
        && listed
        && bundle_checksum(present) == manifest.checksums.bundle
        && manifest.checksums.bundle.get(..BUNDLE_ID_LEN) == Some(manifest.bundle_id.as_str());

    let valid = checksum_match && corrupted_files.is_empty() && missing_files.is_empty();
    if !valid {
        tracing::warn!(
            bundle_id = %manifest.bundle_id,
            corrupted = corrupted_files.len(),
            missing = missing_files.len(),
            checksum_match,
            "bundle failed integrity check"
        );
    }

    IntegrityReport {
        valid,
        checksum_match,
        corrupted_files,
        missing_files,
    }
}
