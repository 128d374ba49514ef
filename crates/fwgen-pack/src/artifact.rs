//! Generated source artifact: preamble, blob declarations, descriptor table

use crate::blob::BlobDecl;
use crate::config::GeneratorConfig;
use crate::descriptor::DescriptorTable;
use crate::error::PackError;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The complete output, assembled in memory before anything touches disk
#[derive(Debug, Default)]
pub struct Artifact {
    /// Unique blobs in first-seen order
    pub blobs: Vec<BlobDecl>,
    /// One row per discovered file in discovery order
    pub table: DescriptorTable,
}

impl Artifact {
    /// Assemble from the two ordered sequences built during the scan
    pub fn new(blobs: Vec<BlobDecl>, table: DescriptorTable) -> Self {
        Self { blobs, table }
    }

    /// Every row must resolve to exactly one blob and carry that blob's length
    pub fn validate(&self) -> Result<(), PackError> {
        let mut by_symbol: HashMap<&str, usize> = HashMap::with_capacity(self.blobs.len());
        for blob in &self.blobs {
            if by_symbol
                .insert(blob.symbol.as_str(), blob.bytes.len())
                .is_some()
            {
                return Err(PackError::InconsistentArtifact(format!(
                    "blob {} declared more than once",
                    blob.symbol
                )));
            }
        }
        for row in self.table.rows() {
            match by_symbol.get(row.symbol.as_str()) {
                None => {
                    return Err(PackError::InconsistentArtifact(format!(
                        "{} references undeclared blob {}",
                        row.relative_path, row.symbol
                    )))
                }
                Some(&len) if len != row.compressed_len => {
                    return Err(PackError::InconsistentArtifact(format!(
                        "{} declares length {} but blob {} is {} bytes",
                        row.relative_path, row.compressed_len, row.symbol, len
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Render the three write phases in order: preamble, blobs, table + count
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let blob_bytes: usize = self.blobs.iter().map(|b| b.bytes.len()).sum();
        let mut out = String::with_capacity(
            config.preamble.len() + blob_bytes * 6 + self.table.count() * 96 + 256,
        );

        out.push_str(&config.preamble);
        if !config.preamble.is_empty() && !config.preamble.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("\n#include <{}>\n", config.include_header));

        for blob in &self.blobs {
            blob.render(config.row_width, &mut out);
        }

        self.table.render(config.table_names(), &mut out);
        out
    }

    /// Validate, render and atomically replace `path` with the result
    pub fn write_to(&self, path: &Path, config: &GeneratorConfig) -> Result<(), PackError> {
        self.validate()?;
        let rendered = self.render(config);
        let tmp_path = tmp_path_for(path);

        let result = write_synced(&tmp_path, rendered.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, path));
        if let Err(source) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(PackError::OutputWriteFailure {
                path: path.to_path_buf(),
                source,
            });
        }
        debug!(path = %path.display(), bytes = rendered.len(), "artifact written");
        Ok(())
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
