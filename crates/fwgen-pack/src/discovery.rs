//! Input discovery: recursive walk of the scan root filtered by extension

use crate::error::PackError;
use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Set of accepted file extensions (case-sensitive, no leading dot)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Parse a comma-separated list such as `"sfi,bseq"`.
    /// Entries are taken verbatim (no trimming); empty entries are dropped,
    /// so an empty list matches nothing.
    pub fn parse(list: &str) -> Self {
        Self::from_iter(list.split(','))
    }

    /// True if no extension can match
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Does this path's extension appear in the filter?
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }

    /// Accepted extensions in sorted order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let extensions = iter
            .into_iter()
            .filter(|s| !s.as_ref().is_empty())
            .map(|s| s.as_ref().to_string())
            .collect();
        Self { extensions }
    }
}

/// Location of one discovered input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// Path as found on disk
    pub absolute: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative: String,
}

/// A discovered input file with its content loaded
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Where the file was found
    pub path: SourcePath,
    /// Raw content
    pub data: Vec<u8>,
}

impl SourceFile {
    /// Read the file's bytes
    pub fn read(path: SourcePath) -> Result<Self, PackError> {
        let data = std::fs::read(&path.absolute).map_err(|source| PackError::InputNotFound {
            path: path.absolute.clone(),
            source,
        })?;
        Ok(Self { path, data })
    }
}

/// Recursively list files under `root` accepted by `filter`.
/// Symlinks to files are listed under their own name; symlinked directories
/// are not descended. Siblings are visited in file-name order so repeated runs agree.
pub fn discover(root: &Path, filter: &ExtensionFilter) -> Result<Vec<SourcePath>, PackError> {
    let meta = std::fs::metadata(root).map_err(|source| PackError::InputNotFound {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(PackError::InputNotFound {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "scan root is not a directory"),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| walk_error(root, err))?;
        if !filter.matches(entry.path()) || !is_file_entry(&entry)? {
            continue;
        }
        let relative = relative_path(root, entry.path());
        debug!(path = %relative, "discovered input");
        found.push(SourcePath {
            absolute: entry.into_path(),
            relative,
        });
    }
    Ok(found)
}

/// Regular file, or a symlink resolving to one. A dangling link is an error.
fn is_file_entry(entry: &walkdir::DirEntry) -> Result<bool, PackError> {
    if entry.file_type().is_file() {
        return Ok(true);
    }
    if !entry.path_is_symlink() {
        return Ok(false);
    }
    let meta = std::fs::metadata(entry.path()).map_err(|source| PackError::InputNotFound {
        path: entry.path().to_path_buf(),
        source,
    })?;
    Ok(meta.is_file())
}

fn walk_error(root: &Path, err: walkdir::Error) -> PackError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    if err.io_error().is_some() {
        PackError::InputNotFound {
            path,
            source: err.into(),
        }
    } else {
        PackError::Walk(err.to_string())
    }
}

/// `path` relative to `root`, joined with `/` regardless of platform
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, data: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, data).unwrap();
    }

    #[test]
    fn parse_drops_empty_entries() {
        let filter = ExtensionFilter::parse("sfi,bseq,,");
        assert_eq!(filter.extensions().collect::<Vec<_>>(), ["bseq", "sfi"]);
        assert!(ExtensionFilter::parse("").is_empty());
        assert!(ExtensionFilter::parse(",,").is_empty());
    }

    #[test]
    fn entries_are_not_trimmed() {
        let filter = ExtensionFilter::parse("bin, sfi");
        assert!(filter.matches(Path::new("fw/a.bin")));
        assert!(!filter.matches(Path::new("fw/a.sfi")));
        assert_eq!(filter.extensions().collect::<Vec<_>>(), [" sfi", "bin"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let filter = ExtensionFilter::parse("bin");
        assert!(filter.matches(Path::new("fw/foo.bin")));
        assert!(!filter.matches(Path::new("fw/foo.BIN")));
        assert!(!filter.matches(Path::new("fw/foo.sfi")));
        assert!(!filter.matches(Path::new("fw/foo")));
        assert!(!filter.matches(Path::new("fw/.bin")));
    }

    #[test]
    fn discovers_recursively_in_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "c/z.bin", b"BBBB");
        touch(dir.path(), "a/x.bin", b"AAAA");
        touch(dir.path(), "b/y.bin", b"AAAA");
        touch(dir.path(), "b/readme.txt", b"not firmware");

        let found = discover(dir.path(), &ExtensionFilter::parse("bin")).unwrap();
        let rel: Vec<_> = found.iter().map(|s| s.relative.as_str()).collect();
        assert_eq!(rel, ["a/x.bin", "b/y.bin", "c/z.bin"]);
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.bin", b"AAAA");
        touch(dir.path(), "noext", b"AAAA");
        assert!(discover(dir.path(), &ExtensionFilter::parse(""))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_root_is_input_not_found() {
        let dir = TempDir::new().unwrap();
        let err = discover(&dir.path().join("nope"), &ExtensionFilter::parse("bin")).unwrap_err();
        assert!(matches!(err, PackError::InputNotFound { .. }));
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.bin", b"AAAA");
        let err = discover(&dir.path().join("x.bin"), &ExtensionFilter::parse("bin")).unwrap_err();
        assert!(matches!(err, PackError::InputNotFound { .. }));
    }

    #[test]
    fn read_loads_content() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.bin", b"AAAA");
        let found = discover(dir.path(), &ExtensionFilter::parse("bin")).unwrap();
        let file = SourceFile::read(found[0].clone()).unwrap();
        assert_eq!(file.data, b"AAAA");
        assert_eq!(file.path.relative, "x.bin");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_discovered_but_not_symlinked_dir() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "fw/ibt-12-16.sfi", b"AAAA");
        touch(dir.path(), "elsewhere/other.sfi", b"BBBB");
        let root = dir.path().join("fw");
        std::os::unix::fs::symlink("ibt-12-16.sfi", root.join("ibt-alias.sfi")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("elsewhere"), root.join("linked")).unwrap();

        let found = discover(&root, &ExtensionFilter::parse("sfi")).unwrap();
        let rel: Vec<_> = found.iter().map(|s| s.relative.as_str()).collect();
        assert_eq!(rel, ["ibt-12-16.sfi", "ibt-alias.sfi"]);
        assert_eq!(SourceFile::read(found[1].clone()).unwrap().data, b"AAAA");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_input_not_found() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.sfi", b"AAAA");
        std::os::unix::fs::symlink("gone.sfi", dir.path().join("broken.sfi")).unwrap();
        std::os::unix::fs::symlink("gone.txt", dir.path().join("broken.txt")).unwrap();

        let err = discover(dir.path(), &ExtensionFilter::parse("sfi")).unwrap_err();
        assert!(matches!(err, PackError::InputNotFound { .. }));
        // links outside the filter are never resolved
        assert_eq!(discover(dir.path(), &ExtensionFilter::parse("bin")).unwrap().len(), 0);
    }

    #[test]
    fn hidden_directories_keep_leading_dot() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".x/a.bin", b"AAAA");
        let found = discover(dir.path(), &ExtensionFilter::parse("bin")).unwrap();
        assert_eq!(found[0].relative, ".x/a.bin");
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let root = Path::new("/fw");
        assert_eq!(relative_path(root, &root.join("a").join("b.sfi")), "a/b.sfi");
    }
}
