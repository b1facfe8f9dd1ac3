//! SHA-256 digests.
//!
//! The bundle checksum hashes the files in name order, each framed as
//! `name NUL length NUL bytes`. The framing keeps file boundaries part of
//! the digest, so moving bytes from one file into its neighbour changes it.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of exact bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Canonical checksum over a set of named files
pub fn bundle_checksum<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut files: Vec<(&str, &[u8])> = files.into_iter().collect();
    files.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    for (name, bytes) in files {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(bytes.len().to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(bytes);
    }
    hex::encode(hasher.finalize())
}

/// 64 lowercase hex chars
pub fn is_checksum(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(is_checksum(&sha256_hex(b"")));
    }

    #[test]
    fn test_is_checksum() {
        assert!(!is_checksum("abc"));
        assert!(!is_checksum(&"A".repeat(64)));
        assert!(!is_checksum(&"g".repeat(64)));
        assert!(is_checksum(&"0f".repeat(32)));
    }

    #[test]
    fn test_bundle_checksum_ignores_input_order() {
        let a = bundle_checksum([("b.txt", &b"two"[..]), ("a.txt", &b"one"[..])]);
        let b = bundle_checksum([("a.txt", &b"one"[..]), ("b.txt", &b"two"[..])]);
        assert_eq!(a, b);
        assert!(is_checksum(&a));
    }

    #[test]
    fn test_bundle_checksum_sees_boundaries() {
        let a = bundle_checksum([("a", &b"xy"[..]), ("b", &b"z"[..])]);
        let b = bundle_checksum([("a", &b"x"[..]), ("b", &b"yz"[..])]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_bundle_checksum_sees_names() {
        let a = bundle_checksum([("prompt.txt", &b"x"[..])]);
        let b = bundle_checksum([("prompt.md", &b"x"[..])]);
        assert_ne!(a, b);
    }
}
