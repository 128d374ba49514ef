//! Generator configuration: output naming and formatting knobs

use crate::blob::DEFAULT_ROW_WIDTH;
use crate::compression::CompressionLevel;
use crate::descriptor::TableNames;
use crate::error::PackError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// License block written at the top of every generated file
pub const DEFAULT_PREAMBLE: &str = r#"/*
 *  Released under "The GNU General Public License (GPL-2.0)"
 *
 *  Copyright (c) 2021 cjiang. All rights reserved.
 *  Copyright (c) 2021 williambj1. All rights reserved.
 *  Copyright (C) 2015 Intel Corporation.
 *
 *  This program is free software; you can redistribute it and/or modify it
 *  under the terms of the GNU General Public License as published by the
 *  Free Software Foundation; either version 2 of the License, or (at your
 *  option) any later version.
 *
 *  This program is distributed in the hope that it will be useful, but
 *  WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
 *  or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License
 *  for more details.
 *
 *  You should have received a copy of the GNU General Public License along
 *  with this program; if not, write to the Free Software Foundation, Inc.,
 *  59 Temple Place, Suite 330, Boston, MA 02111-1307 USA
 *
 */
"#;

/// Configuration for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Bytes per row in blob declarations
    pub row_width: usize,
    /// zlib level for new blobs
    pub compression_level: CompressionLevel,
    /// Prefix of blob symbol names; the hex digest follows
    pub symbol_prefix: String,
    /// Element type of the descriptor table
    pub descriptor_type: String,
    /// Name of the descriptor table array
    pub table_name: String,
    /// Name of the total count variable
    pub count_name: String,
    /// Header declaring the descriptor type, emitted as `#include <...>`
    pub include_header: String,
    /// Boilerplate written before the include line
    pub preamble: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            row_width: DEFAULT_ROW_WIDTH,
            compression_level: CompressionLevel::default(),
            symbol_prefix: String::from("firmware_"),
            descriptor_type: String::from("FirmwareDescriptor"),
            table_name: String::from("fwCandidates"),
            count_name: String::from("fwCount"),
            include_header: String::from("FirmwareList.h"),
            preamble: String::from(DEFAULT_PREAMBLE),
        }
    }
}

impl GeneratorConfig {
    /// Load from a `.toml` or `.json` file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, PackError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PackError::Config(format!("{}: {}", path.display(), e)))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let config: GeneratorConfig = match ext.to_lowercase().as_str() {
            "toml" => toml::from_str(&contents).map_err(|e| PackError::Config(e.to_string()))?,
            "json" => {
                serde_json::from_str(&contents).map_err(|e| PackError::Config(e.to_string()))?
            }
            _ => {
                return Err(PackError::Config(format!(
                    "Unsupported config file extension: {}",
                    ext
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce an unusable artifact
    pub fn validate(&self) -> Result<(), PackError> {
        if self.row_width == 0 {
            return Err(PackError::Config("row_width must be at least 1".into()));
        }
        for (field, value) in [
            ("symbol_prefix", &self.symbol_prefix),
            ("descriptor_type", &self.descriptor_type),
            ("table_name", &self.table_name),
            ("count_name", &self.count_name),
        ] {
            if !is_c_identifier(value) {
                return Err(PackError::Config(format!(
                    "{} is not a valid C identifier: {:?}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    /// Table naming as used by the descriptor renderer
    pub fn table_names(&self) -> TableNames<'_> {
        TableNames {
            descriptor_type: &self.descriptor_type,
            table_name: &self.table_name,
            count_name: &self.count_name,
        }
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
