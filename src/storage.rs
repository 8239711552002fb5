//! Reading stored content values from disk.
//!
//! A content file holds exactly what the backend stores for one field: a
//! JSON document string, or a legacy plain-text string.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::domain::{Content, Hierarchy, HierarchyError};

/// Errors that can occur while loading stored content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("content file not found: {0}")]
    NotFound(PathBuf),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// Loads and parses one stored content value.
///
/// One trailing newline (`\n` or `\r\n`), as left by most editors, is not
/// part of the value. Any further line breaks are.
///
/// # Errors
///
/// Returns an error if the file cannot be read. The content itself never
/// fails to parse; see [`Content::parse`].
pub fn load_content(path: &Path) -> Result<Content, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "loaded content");
    let value = raw
        .strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(&raw);
    Ok(Content::parse(value))
}

/// Lists the content files under `root`, sorted by path.
///
/// A file is included directly; a directory is searched recursively for
/// `*.json` files. Unreadable entries are skipped with a warning.
#[must_use]
pub fn scan(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
}

/// A [`HierarchySource`](crate::editor::HierarchySource) backed by a JSON
/// file holding the backend's hierarchy response.
#[derive(Debug, Clone)]
pub struct HierarchyFile {
    path: PathBuf,
}

impl HierarchyFile {
    /// Creates a source reading from `path` on every fetch.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and parses the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Hierarchy, HierarchyError> {
        let json = fs::read_to_string(&self.path)?;
        Hierarchy::from_json(&json)
    }
}

impl crate::editor::HierarchySource for HierarchyFile {
    fn fetch(&self) -> Result<Hierarchy, HierarchyError> {
        self.load()
    }
}
