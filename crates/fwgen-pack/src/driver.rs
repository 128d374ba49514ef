//! Generation driver: Init → ScanningFiles → Finalized

use crate::{
    artifact::Artifact,
    blob::BlobEmitter,
    compression::compress,
    config::GeneratorConfig,
    descriptor::DescriptorTable,
    discovery::{discover, ExtensionFilter, SourceFile},
    error::PackError,
    fingerprint::sha1_digest,
    ledger::{Ledger, Registration},
    stats::PackStats,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Lifecycle of a single run. There is no way back from `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Output location checked, nothing scanned yet
    Init,
    /// Files are being hashed, deduplicated and compressed
    ScanningFiles,
    /// Artifact written; the run is over
    Finalized,
}

impl DriverState {
    /// State name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DriverState::Init => "Init",
            DriverState::ScanningFiles => "ScanningFiles",
            DriverState::Finalized => "Finalized",
        }
    }

    fn can_transition_to(&self, next: DriverState) -> bool {
        matches!(
            (self, next),
            (DriverState::Init, DriverState::ScanningFiles)
                | (DriverState::ScanningFiles, DriverState::Finalized)
        )
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Path of the written artifact
    pub output: PathBuf,
    /// Dedupe and compression statistics
    pub stats: PackStats,
}

/// Runs one generation pass. The ledger lives only as long as the generator.
pub struct Generator {
    config: GeneratorConfig,
    state: DriverState,
    ledger: Ledger,
    blobs: BlobEmitter,
    table: DescriptorTable,
    stats: PackStats,
}

impl Generator {
    /// Create a generator in the `Init` state
    pub fn new(config: GeneratorConfig) -> Result<Self, PackError> {
        config.validate()?;
        let ledger = Ledger::new(config.symbol_prefix.clone());
        Ok(Self {
            config,
            state: DriverState::Init,
            ledger,
            blobs: BlobEmitter::new(),
            table: DescriptorTable::new(),
            stats: PackStats::default(),
        })
    }

    fn transition(&mut self, next: DriverState) -> Result<(), PackError> {
        if !self.state.can_transition_to(next) {
            return Err(PackError::InvalidState {
                from: self.state.name(),
                to: next.name(),
            });
        }
        debug!(from = self.state.name(), to = next.name(), "driver transition");
        self.state = next;
        Ok(())
    }

    /// Scan `root` for files accepted by `filter` and write the artifact to `output`.
    #[instrument(skip_all, fields(output = %output.display(), root = %root.display()))]
    pub fn run(
        mut self,
        output: &Path,
        root: &Path,
        filter: &ExtensionFilter,
    ) -> Result<GenerateReport, PackError> {
        prepare_output_dir(output)?;
        info!(
            extensions = ?filter.extensions().collect::<Vec<_>>(),
            "generating firmware table"
        );

        self.transition(DriverState::ScanningFiles)?;
        for path in discover(root, filter)? {
            let file = SourceFile::read(path)?;
            self.process_file(file)?;
        }

        self.transition(DriverState::Finalized)?;
        self.stats.finish();
        let artifact = Artifact::new(self.blobs.into_decls(), self.table);
        artifact.write_to(output, &self.config)?;

        info!(
            files = self.stats.files_total,
            unique_blobs = self.stats.unique_blobs,
            duplicate_files = self.stats.duplicate_files,
            input_bytes = self.stats.input_bytes,
            compressed_bytes = self.stats.compressed_bytes,
            bytes_saved_by_dedup = self.stats.bytes_saved_by_dedup,
            "firmware table generated"
        );
        Ok(GenerateReport {
            output: output.to_path_buf(),
            stats: self.stats,
        })
    }

    /// Hash one file, reuse or create its blob, and append its descriptor row
    fn process_file(&mut self, file: SourceFile) -> Result<(), PackError> {
        if self.state != DriverState::ScanningFiles {
            return Err(PackError::InvalidState {
                from: self.state.name(),
                to: DriverState::ScanningFiles.name(),
            });
        }
        let digest = sha1_digest(&file.data);
        let level = self.config.compression_level;
        let registration = self
            .ledger
            .lookup_or_register(digest, || compress(&file.data, level))?;

        match &registration {
            Registration::Existing(blob) => {
                debug!(
                    path = %file.path.relative,
                    symbol = %blob.symbol,
                    references = self.ledger.references(&digest),
                    saved = file.data.len(),
                    "duplicate content, reusing blob"
                );
                self.stats.record_duplicate(file.data.len());
            }
            Registration::New { blob, .. } => {
                debug!(
                    path = %file.path.relative,
                    original = file.data.len(),
                    compressed = blob.compressed_len,
                    "blob compressed"
                );
                self.stats.record_new(file.data.len(), blob.compressed_len);
            }
        }

        self.table.emit_row(file.path.relative, registration.blob());
        if let Registration::New { blob, compressed } = registration {
            self.blobs.emit(&blob, compressed);
        }
        Ok(())
    }
}

/// Create the output's parent directory if the output does not exist yet.
/// Only the last path segment is created; a missing grandparent is an error.
fn prepare_output_dir(output: &Path) -> Result<(), PackError> {
    if output.exists() {
        return Ok(());
    }
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if parent.is_dir() {
        return Ok(());
    }
    match std::fs::create_dir(parent) {
        Ok(()) => {
            debug!(dir = %parent.display(), "created output directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && parent.is_dir() => Ok(()),
        Err(source) => Err(PackError::OutputWriteFailure {
            path: parent.to_path_buf(),
            source,
        }),
    }
}

/// Run with the given configuration; the usual entry point
pub fn generate(
    output: &Path,
    root: &Path,
    filter: &ExtensionFilter,
    config: GeneratorConfig,
) -> Result<GenerateReport, PackError> {
    Generator::new(config)?.run(output, root, filter)
}
