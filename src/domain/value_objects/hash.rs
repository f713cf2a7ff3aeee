//! Content Hash Value Object
//!
//! Digest of generated stylesheet content, used by the `[hash]` template token.

use std::fmt;

use sha2::{Digest, Sha256};

/// Content hash value object
///
/// Wraps the full lowercase hex SHA-256 digest of some content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Number of hex characters embedded in artifact filenames
    pub const SHORT_LEN: usize = 8;

    /// Compute the SHA-256 digest of `content`
    pub fn from_content(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        Self(format!("{:x}", digest))
    }

    /// Full hex digest
    pub fn hex(&self) -> &str {
        &self.0
    }

    /// First eight hex characters, as used in `[hash]`
    pub fn short(&self) -> &str {
        &self.0[..Self::SHORT_LEN]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
