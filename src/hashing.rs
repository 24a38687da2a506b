//! Centralized module for cryptographic hashing algorithms.

use sha2::{Digest, Sha256};

/// Computes the MD5 digest of the given data and returns it as a hex string.
///
/// MD5 is used for artifact identity and import hashing because that is what
/// the surrounding threat-intel ecosystem keys on, not for integrity.
pub fn md5_digest(data: &[u8]) -> String {
    let digest = md5::compute(data);
    hex::encode(digest.0)
}

/// Computes the SHA-256 digest of the given data and returns it as a hex string.
pub fn sha256_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_digest() {
        // RFC 1321 reference vectors
        assert_eq!(md5_digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_digest(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha256_digest() {
        assert_eq!(
            sha256_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_md5_digest_is_lower_hex() {
        let d = md5_digest(b"carcharoth");
        assert_eq!(d.len(), 32);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
