//! Deterministic ZIP archives.
//!
//! Entries are written in name order with a fixed timestamp (1980-01-01,
//! the ZIP epoch) and fixed permissions, so the same files always produce
//! the same archive bytes.

use forge_core::ExportError;
use forge_integrity::{verify_bundle, IntegrityReport, Manifest, MANIFEST_FILE};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Largest uncompressed entry accepted when reading an archive
pub const MAX_ENTRY_BYTES: u64 = 32 * 1024 * 1024;

/// Largest uncompressed total accepted when reading an archive
pub const MAX_ARCHIVE_BYTES: u64 = 128 * 1024 * 1024;

/// Pack files into a ZIP archive
pub fn write_archive(files: &BTreeMap<String, Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in files {
        zip.start_file(name.as_str(), options).map_err(archive_error)?;
        zip.write_all(bytes).map_err(archive_error)?;
    }
    let cursor = zip.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

/// Unpack every file entry of an archive
pub fn read_archive(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, ExportError> {
    read_archive_within(bytes, MAX_ENTRY_BYTES, MAX_ARCHIVE_BYTES)
}

/// Unpack with limits on inflated sizes. Declared entry sizes are not
/// trusted: reads stop one byte past the limit.
fn read_archive_within(
    bytes: &[u8],
    max_entry: u64,
    max_total: u64,
) -> Result<BTreeMap<String, Vec<u8>>, ExportError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;

    let mut files = BTreeMap::new();
    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(archive_error)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        let mut buf = Vec::with_capacity(entry.size().min(max_entry) as usize);
        entry.take(max_entry + 1).read_to_end(&mut buf).map_err(archive_error)?;
        if buf.len() as u64 > max_entry {
            return Err(ExportError::Archive(format!(
                "entry {} exceeds {} bytes",
                name, max_entry
            )));
        }

        total += buf.len() as u64;
        if total > max_total {
            return Err(ExportError::Archive(format!(
                "archive exceeds {} bytes uncompressed",
                max_total
            )));
        }

        if files.insert(name.clone(), buf).is_some() {
            return Err(ExportError::Archive(format!("duplicate entry {}", name)));
        }
    }
    Ok(files)
}

/// Check a produced archive against the manifest it carries
pub fn verify_archive(bytes: &[u8]) -> Result<IntegrityReport, ExportError> {
    let files = read_archive(bytes)?;
    let manifest_bytes = files
        .get(MANIFEST_FILE)
        .ok_or_else(|| ExportError::Archive(format!("archive has no {}", MANIFEST_FILE)))?;
    let manifest = Manifest::from_json(manifest_bytes)?;
    Ok(verify_bundle(&files, &manifest))
}

fn archive_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Archive(err.to_string())
}
