use anyhow::{Context, Result};
use clap::Parser;
use fwgen_pack::{generate, ExtensionFilter, GenerateReport, GeneratorConfig};
use std::path::{Path, PathBuf};

/// Environment variable naming an optional `.toml`/`.json` generator config
pub const CONFIG_ENV: &str = "FWGEN_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "fw-gen")]
#[command(about = "Embed a firmware directory as a generated C source file", long_about = None)]
pub struct Cli {
    /// Generated source file to write
    pub output: PathBuf,

    /// Directory scanned recursively for firmware files
    pub input_root: PathBuf,

    /// Comma-separated extensions to include, without dots (e.g. "sfi,bseq")
    pub extensions: String,
}

impl Cli {
    pub fn run(self) -> Result<GenerateReport> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => load_config(Path::new(&path))?,
            None => GeneratorConfig::default(),
        };
        let filter = ExtensionFilter::parse(&self.extensions);
        if filter.is_empty() {
            tracing::warn!("Extension list {:?} matches nothing", self.extensions);
        }
        generate(&self.output, &self.input_root, &filter, config).with_context(|| {
            format!(
                "generating {} from {}",
                self.output.display(),
                self.input_root.display()
            )
        })
    }
}

pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    tracing::info!("Loading generator config from {}", path.display());
    GeneratorConfig::from_file(path)
        .with_context(|| format!("loading config {}", path.display()))
}
