//! Descriptor table: one row per discovered file, duplicates included

use crate::ledger::BlobRef;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Maps an original relative path to its (possibly shared) blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRow {
    /// Path relative to the scan root, `/`-separated; the runtime lookup key
    pub relative_path: String,
    /// Symbol of the referenced blob
    pub symbol: String,
    /// Compressed length to decompress with
    pub compressed_len: usize,
}

/// Names used when rendering the table
#[derive(Debug, Clone, Copy)]
pub struct TableNames<'a> {
    /// Element type, e.g. `FirmwareDescriptor`
    pub descriptor_type: &'a str,
    /// Array name, e.g. `fwCandidates`
    pub table_name: &'a str,
    /// Count variable name, e.g. `fwCount`
    pub count_name: &'a str,
}

/// Ordered descriptor rows in discovery order
#[derive(Debug, Default, Clone)]
pub struct DescriptorTable {
    rows: Vec<DescriptorRow>,
}

impl DescriptorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row for a file, taking symbol and length from its blob reference
    pub fn emit_row(&mut self, relative_path: impl Into<String>, blob: &BlobRef) {
        self.rows.push(DescriptorRow {
            relative_path: relative_path.into(),
            symbol: blob.symbol.clone(),
            compressed_len: blob.compressed_len,
        });
    }

    /// Rows in emission order
    pub fn rows(&self) -> &[DescriptorRow] {
        &self.rows
    }

    /// Total row count, written after the table
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Render the table wrapper, every row, then the count
    pub fn render(&self, names: TableNames<'_>, out: &mut String) {
        let _ = write!(
            out,
            "\n{} {}[] = \n{{\n",
            names.descriptor_type, names.table_name
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "\t{{ \"{}\", {}, {} }},",
                c_string_escape(&row.relative_path),
                row.symbol,
                row.compressed_len
            );
        }
        out.push_str("};\n\n");
        let _ = write!(out, "int {} = {};", names.count_name, self.count());
    }
}

/// Escape text for use inside a C string literal
pub fn c_string_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            // '?' escaped so "??x" is never read as a trigraph
            b'?' => out.push_str("\\?"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}
