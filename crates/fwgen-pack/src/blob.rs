//! Byte-array declarations for compressed blobs

use crate::ledger::BlobRef;
use std::collections::HashSet;
use std::fmt::Write;

/// Default number of bytes per rendered row
pub const DEFAULT_ROW_WIDTH: usize = 16;

/// One compressed blob, emitted once per unique digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDecl {
    /// Symbol name of the array
    pub symbol: String,
    /// Compressed bytes
    pub bytes: Vec<u8>,
}

impl BlobDecl {
    /// Render as `UInt8 <symbol>[] = { ... };` with `row_width` bytes per row.
    /// The final row carries only the remaining bytes.
    pub fn render(&self, row_width: usize, out: &mut String) {
        let row_width = row_width.max(1);
        let _ = write!(out, "\nUInt8 {}[] = \n{{\n", self.symbol);
        for row in self.bytes.chunks(row_width) {
            render_row(row, out);
        }
        out.push_str("};\n");
    }
}

fn render_row(row: &[u8], out: &mut String) {
    out.push('\t');
    for (i, b) in row.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "0x{:02X},", b);
    }
    out.push('\n');
}

/// Collects blob declarations in first-seen order
#[derive(Debug, Default)]
pub struct BlobEmitter {
    decls: Vec<BlobDecl>,
    symbols: HashSet<String>,
}

impl BlobEmitter {
    /// Create an empty emitter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declaration for a newly registered blob.
    /// Returns false (and records nothing) if the symbol was already emitted.
    pub fn emit(&mut self, blob: &BlobRef, compressed: Vec<u8>) -> bool {
        debug_assert_eq!(blob.compressed_len, compressed.len());
        if !self.symbols.insert(blob.symbol.clone()) {
            return false;
        }
        self.decls.push(BlobDecl {
            symbol: blob.symbol.clone(),
            bytes: compressed,
        });
        true
    }

    /// Declarations in emission order
    pub fn decls(&self) -> &[BlobDecl] {
        &self.decls
    }

    /// Consume into the ordered declarations
    pub fn into_decls(self) -> Vec<BlobDecl> {
        self.decls
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// No declarations yet?
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decl(bytes: Vec<u8>) -> BlobDecl {
        BlobDecl {
            symbol: "firmware_test".to_string(),
            bytes,
        }
    }

    fn parse_rows(rendered: &str) -> Vec<Vec<u8>> {
        rendered
            .lines()
            .filter(|l| l.starts_with('\t'))
            .map(|l| {
                l.trim()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| u8::from_str_radix(s.trim_start_matches("0x"), 16).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn renders_full_and_partial_rows() {
        let bytes: Vec<u8> = (0..20).collect();
        let mut out = String::new();
        decl(bytes).render(16, &mut out);
        assert_eq!(
            out,
            "\nUInt8 firmware_test[] = \n{\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,\n\
             \t0x10, 0x11, 0x12, 0x13,\n\
             };\n"
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_row() {
        let mut out = String::new();
        decl(vec![0xFF; 32]).render(16, &mut out);
        let rows = parse_rows(&out);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 16));
    }

    #[test]
    fn empty_blob_has_no_rows() {
        let mut out = String::new();
        decl(Vec::new()).render(16, &mut out);
        assert_eq!(out, "\nUInt8 firmware_test[] = \n{\n};\n");
    }

    #[test]
    fn emitter_rejects_repeated_symbol() {
        let mut emitter = BlobEmitter::new();
        let blob = BlobRef {
            symbol: "firmware_aa".into(),
            compressed_len: 2,
        };
        assert!(emitter.emit(&blob, vec![1, 2]));
        assert!(!emitter.emit(&blob, vec![1, 2]));
        assert_eq!(emitter.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_rows_preserve_bytes(
            bytes in prop::collection::vec(0u8..=255, 0..600),
            width in 1usize..40,
        ) {
            let mut out = String::new();
            decl(bytes.clone()).render(width, &mut out);
            let rows = parse_rows(&out);
            for row in rows.iter().rev().skip(1) {
                prop_assert_eq!(row.len(), width);
            }
            if let Some(last) = rows.last() {
                prop_assert!(!last.is_empty() && last.len() <= width);
            }
            let flat: Vec<u8> = rows.into_iter().flatten().collect();
            prop_assert_eq!(flat, bytes);
        }
    }
}
