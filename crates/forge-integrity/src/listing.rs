//! `checksum.txt` listing.
use crate::manifest::Manifest;

/// Human-readable checksum listing for a manifest. Lines use the
/// `<hash>  <name>` layout that `sha256sum -c` understands.
pub fn checksum_listing(manifest: &Manifest) -> String {
    let mut out = String::from("SHA256 Checksums\n================\n\nIndividual Files:\n");
    for (name, checksum) in &manifest.checksums.individual {
        out.push_str(checksum);
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }
    out.push_str("\nBundle Checksum: ");
    out.push_str(&manifest.checksums.bundle);
    out.push('\n');
    out
}
