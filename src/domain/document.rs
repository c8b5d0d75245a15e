//! Documents discovered in the source tree and the output paths they map to.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Suffix a file name must carry to be picked up as a markdown source.
pub const MARKDOWN_SUFFIX: &str = ".md";
/// Extension given to every generated page.
pub const HTML_EXTENSION: &str = "html";

/// A markdown source located under the source root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentFile {
    /// Path relative to the source root. Declared first so ordering follows it.
    relative_path: PathBuf,
    /// Absolute path on disk.
    source_path: PathBuf,
}

impl DocumentFile {
    /// Build a document from a path found under `source_root`. Returns `None`
    /// when the path does not live under the root.
    pub fn new(source_root: &Path, source_path: PathBuf) -> Option<Self> {
        let relative_path = source_path.strip_prefix(source_root).ok()?.to_path_buf();
        if relative_path.as_os_str().is_empty() {
            return None;
        }

        Some(Self {
            relative_path,
            source_path,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Destination of the rendered page: the relative path with its final
    /// suffix swapped for `.html`, re-rooted under `build_root`.
    pub fn output_path(&self, build_root: &Path) -> PathBuf {
        build_root.join(self.relative_path.with_extension(HTML_EXTENSION))
    }
}

/// Whether a file name matches `*.md`. Matching is case-sensitive.
pub fn is_markdown_name(name: &OsStr) -> bool {
    name.as_encoded_bytes()
        .ends_with(MARKDOWN_SUFFIX.as_bytes())
}
