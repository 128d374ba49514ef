#![warn(missing_docs)]

//! fwgen packer: embeds a firmware directory as generated C source
//!
//! Pipeline: File → Fingerprint (SHA-1) → Ledger → Compress (zlib, first sight only) → Blob decl
//!           every file → Descriptor row → Artifact (preamble, blobs, table, count)

pub mod artifact;
pub mod blob;
pub mod compression;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod stats;

pub use artifact::Artifact;
pub use blob::{BlobDecl, BlobEmitter, DEFAULT_ROW_WIDTH};
pub use compression::{compress, CompressionLevel};
pub use config::{GeneratorConfig, DEFAULT_PREAMBLE};
pub use descriptor::{DescriptorRow, DescriptorTable, TableNames};
pub use discovery::{discover, ExtensionFilter, SourceFile, SourcePath};
pub use driver::{generate, DriverState, GenerateReport, Generator};
pub use error::PackError;
pub use fingerprint::{sha1_digest, ContentDigest};
pub use ledger::{BlobRef, Ledger, Registration};
pub use stats::PackStats;
