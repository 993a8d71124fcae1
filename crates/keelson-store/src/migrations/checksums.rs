//! Migration checksums
//!
//! SHA-256 over the raw migration SQL, hex-encoded

use sha2::{Digest, Sha256};

/// Compute the checksum for a migration's SQL text
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(compute_checksum("CREATE TABLE t (id)"), compute_checksum("CREATE TABLE t (id)"));
        assert_ne!(compute_checksum("a"), compute_checksum("b"));
    }
}
