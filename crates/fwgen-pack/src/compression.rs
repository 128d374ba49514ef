//! zlib (deflate) compression for embedded blobs

use crate::error::PackError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// zlib compression level (0 = store, 9 = best ratio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// Highest level zlib accepts
    pub const MAX: u32 = 9;

    /// Create a level, clamping values above 9
    pub fn new(level: u32) -> Self {
        Self(level.min(Self::MAX))
    }

    /// Numeric level
    pub fn get(&self) -> u32 {
        self.0.min(Self::MAX)
    }
}

impl Default for CompressionLevel {
    /// Level 6, the zlib default
    fn default() -> Self {
        Self(6)
    }
}

/// Compress data into a zlib stream. Consumers decompress with any zlib inflater.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>, PackError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level.get()),
    );
    encoder
        .write_all(data)
        .map_err(|e| PackError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PackError::CompressionFailed(e.to_string()))
}
