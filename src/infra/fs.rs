//! Filesystem access for a build: resolving the two roots, discovering
//! markdown sources, and reading and writing documents.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    config::PathSettings,
    domain::document::{DocumentFile, is_markdown_name},
};

use super::error::InfraError;

/// Absolute, canonical roots for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
}

/// Canonicalize both roots. The source must already exist as a directory;
/// the destination is created (with any missing ancestors) when absent.
pub async fn resolve_paths(paths: &PathSettings) -> Result<ResolvedPaths, InfraError> {
    let not_found = |source| InfraError::PathNotFound {
        path: paths.src_dir.clone(),
        source,
    };

    let src_dir = fs::canonicalize(&paths.src_dir).await.map_err(not_found)?;
    let metadata = fs::metadata(&src_dir).await.map_err(not_found)?;
    if !metadata.is_dir() {
        return Err(InfraError::NotADirectory { path: src_dir });
    }

    fs::create_dir_all(&paths.build_dir)
        .await
        .map_err(|source| InfraError::write(&paths.build_dir, source))?;
    let build_dir = fs::canonicalize(&paths.build_dir)
        .await
        .map_err(|source| InfraError::write(&paths.build_dir, source))?;

    Ok(ResolvedPaths { src_dir, build_dir })
}

/// Lazily walk `src_dir`, following symbolic links, yielding every regular
/// file named `*.md`. Order is whatever the directory listing produces.
pub fn enumerate_documents(
    src_dir: &Path,
) -> impl Iterator<Item = Result<DocumentFile, InfraError>> + '_ {
    WalkDir::new(src_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() || !is_markdown_name(entry.file_name()) {
                    return None;
                }
                DocumentFile::new(src_dir, entry.into_path()).map(Ok)
            }
            Err(err) => Some(Err(InfraError::Walk {
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| src_dir.to_path_buf()),
                message: err.to_string(),
            })),
        })
}

/// Read the complete text of a source document.
pub async fn read_document(document: &DocumentFile) -> Result<String, InfraError> {
    let path = document.source_path();
    fs::read_to_string(path)
        .await
        .map_err(|source| InfraError::file_read(path, source))
}

/// Write `contents` to `path`, creating missing parent directories and
/// replacing any existing file.
pub async fn write_document(path: &Path, contents: &str) -> Result<(), InfraError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| InfraError::write(parent, source))?;
        debug!(
            target = "docs_builder::infra::fs",
            dir = %parent.display(),
            "Ensured output directory"
        );
    }

    fs::write(path, contents)
        .await
        .map_err(|source| InfraError::write(path, source))
}
