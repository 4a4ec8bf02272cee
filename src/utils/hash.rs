//! Content hashing for output filenames using blake3.
//!
//! The digest is a pure function of the bytes, so identical assets under
//! different names end up with the same suffix.

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

/// Hex digits of the digest used in filenames.
pub const FILENAME_HASH_LEN: usize = 32;

impl ContentHash {
    /// Hash a byte slice.
    #[inline]
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Shortened hex form embedded in `stem-<hash>.ext`.
    pub fn fingerprint(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(FILENAME_HASH_LEN);
        hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_hash() {
        assert_eq!(ContentHash::of(b"abc"), ContentHash::of(b"abc"));
        assert_ne!(ContentHash::of(b"abc"), ContentHash::of(b"abd"));
    }

    #[test]
    fn test_fingerprint_len() {
        let fp = ContentHash::of(b"hello world").fingerprint();
        assert_eq!(fp.len(), FILENAME_HASH_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
