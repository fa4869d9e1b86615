//! MD5 checksum utility for tamper detection.
//!
//! Ledger rows store the digest in an `md5` column, so the algorithm is fixed.

use md5::{Digest, Md5};

/// Compute the lowercase hex MD5 checksum of raw script bytes
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(compute_checksum(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            compute_checksum(b"SHOW TABLES"),
            compute_checksum("SHOW TABLES".as_bytes())
        );
    }

    #[test]
    fn test_detects_single_byte_edit() {
        assert_ne!(
            compute_checksum(b"CREATE TABLE t (x Int32) ENGINE=Memory"),
            compute_checksum(b"CREATE TABLE t (x Int64) ENGINE=Memory")
        );
    }
}
