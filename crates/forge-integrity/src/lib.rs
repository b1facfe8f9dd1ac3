//! Forge Integrity: checksums and manifests pinned to the exported bytes
//!
//! Every file in a bundle is hashed with SHA-256, the whole file set gets a
//! canonical bundle checksum, and a [`Manifest`] records both. The same
//! manifest is later enough to prove a bundle (or an unpacked archive) is
//! intact with [`verify_bundle`].

pub mod checksum;
pub mod listing;
pub mod manifest;
pub mod verify;

pub use checksum::{bundle_checksum, is_checksum, sha256_hex};
pub use listing::checksum_listing;
pub use manifest::{Checksums, FileEntry, Manifest, ManifestBuilder, ManifestMetadata};
pub use verify::{verify_bundle, IntegrityReport};

/// Name of the serialized manifest inside a bundle
pub const MANIFEST_FILE: &str = "manifest.json";

/// Name of the human-readable checksum listing inside a bundle
pub const CHECKSUM_FILE: &str = "checksum.txt";

/// Number of checksum hex chars that make up a bundle id
pub const BUNDLE_ID_LEN: usize = 12;
