//! Per-run dedupe and compression statistics

use serde::{Deserialize, Serialize};

/// Statistics from a generation run
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackStats {
    /// Files matched by the extension filter
    pub files_total: usize,
    /// Distinct contents, i.e. emitted blobs
    pub unique_blobs: usize,
    /// Files whose content matched an earlier file
    pub duplicate_files: usize,
    /// Total raw bytes read
    pub input_bytes: u64,
    /// Raw bytes of unique contents only
    pub bytes_after_dedup: u64,
    /// Total bytes of emitted blobs
    pub compressed_bytes: u64,
    /// Raw bytes never compressed or emitted thanks to dedupe
    pub bytes_saved_by_dedup: u64,
    /// bytes_after_dedup / compressed_bytes
    pub compression_ratio: f64,
    /// input_bytes / bytes_after_dedup
    pub dedup_ratio: f64,
}

impl PackStats {
    /// Account for one file whose content was new
    pub fn record_new(&mut self, raw_len: usize, compressed_len: usize) {
        self.files_total += 1;
        self.unique_blobs += 1;
        self.input_bytes += raw_len as u64;
        self.bytes_after_dedup += raw_len as u64;
        self.compressed_bytes += compressed_len as u64;
    }

    /// Account for one file whose content was already emitted
    pub fn record_duplicate(&mut self, raw_len: usize) {
        self.files_total += 1;
        self.duplicate_files += 1;
        self.input_bytes += raw_len as u64;
        self.bytes_saved_by_dedup += raw_len as u64;
    }

    /// Compute the derived ratios once all files are recorded
    pub fn finish(&mut self) {
        self.compression_ratio = if self.compressed_bytes > 0 {
            self.bytes_after_dedup as f64 / self.compressed_bytes as f64
        } else {
            1.0
        };
        self.dedup_ratio = if self.bytes_after_dedup > 0 {
            self.input_bytes as f64 / self.bytes_after_dedup as f64
        } else {
            1.0
        };
    }
}
