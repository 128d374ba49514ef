//! Content fingerprinting: SHA-1 digests used as the dedupe key

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// A 20-byte SHA-1 digest identifying a file's content. Used as the ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 20]);

impl ContentDigest {
    /// Return the digest as a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
    /// Return the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the SHA-1 digest of data
pub fn sha1_digest(data: &[u8]) -> ContentDigest {
    ContentDigest(Sha1::digest(data).into())
}
