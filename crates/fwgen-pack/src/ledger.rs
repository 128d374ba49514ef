//! Run-scoped deduplication ledger: content digest → compressed blob reference

use crate::fingerprint::ContentDigest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference to one emitted compressed blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    /// Generated symbol name of the byte array
    pub symbol: String,
    /// Length of the compressed bytes, as recorded when the blob was created
    pub compressed_len: usize,
}

/// Outcome of [`Ledger::lookup_or_register`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Digest was already known; reuse the existing blob
    Existing(BlobRef),
    /// Digest was new; the blob must be emitted with these compressed bytes
    New {
        /// Freshly registered reference
        blob: BlobRef,
        /// Compressed content to emit
        compressed: Vec<u8>,
    },
}

impl Registration {
    /// The blob reference regardless of outcome
    pub fn blob(&self) -> &BlobRef {
        match self {
            Registration::Existing(blob) => blob,
            Registration::New { blob, .. } => blob,
        }
    }

    /// True if this registration reused an earlier blob
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Registration::Existing(_))
    }
}

/// Derive the blob symbol for a digest
pub fn symbol_name(prefix: &str, digest: &ContentDigest) -> String {
    format!("{}{}", prefix, digest.to_hex())
}

#[derive(Debug)]
struct LedgerEntry {
    blob: BlobRef,
    references: u64,
}

/// Digest → blob mapping for one generation run.
/// Entries are only ever added; a registered blob is never changed.
#[derive(Debug)]
pub struct Ledger {
    symbol_prefix: String,
    entries: HashMap<ContentDigest, LedgerEntry>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new("firmware_")
    }
}

impl Ledger {
    /// Create an empty ledger naming blobs `<symbol_prefix><hex digest>`
    pub fn new(symbol_prefix: impl Into<String>) -> Self {
        Self {
            symbol_prefix: symbol_prefix.into(),
            entries: HashMap::new(),
        }
    }

    /// Existing blob for a digest, if any
    pub fn lookup(&self, digest: &ContentDigest) -> Option<&BlobRef> {
        self.entries.get(digest).map(|e| &e.blob)
    }

    /// Reuse the blob for `digest`, or call `compress` once and register a new one.
    /// `compress` is never invoked for a digest that is already registered.
    pub fn lookup_or_register<F, E>(
        &mut self,
        digest: ContentDigest,
        compress: F,
    ) -> Result<Registration, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        if let Some(entry) = self.entries.get_mut(&digest) {
            entry.references += 1;
            return Ok(Registration::Existing(entry.blob.clone()));
        }

        let compressed = compress()?;
        let blob = BlobRef {
            symbol: symbol_name(&self.symbol_prefix, &digest),
            compressed_len: compressed.len(),
        };
        self.entries.insert(
            digest,
            LedgerEntry {
                blob: blob.clone(),
                references: 1,
            },
        );
        Ok(Registration::New { blob, compressed })
    }

    /// Number of files that resolved to this digest (0 if unknown)
    pub fn references(&self, digest: &ContentDigest) -> u64 {
        self.entries.get(digest).map(|e| e.references).unwrap_or(0)
    }

    /// Number of unique blobs registered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the ledger empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
