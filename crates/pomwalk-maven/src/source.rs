//! Manifest sources: the filesystem and an in-memory store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use pomwalk_core::source::{ManifestSource, SourceError};
use pomwalk_core::tree::PomMap;

use crate::xml::parse_tree;

/// Reads manifests from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ManifestSource for FileSource {
    fn load(&self, path: &Path) -> Result<PomMap, SourceError> {
        tracing::debug!("reading manifest {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse(path, &content)
    }
}

/// Manifests held in memory, keyed by path. Entries can be replaced at any
/// time; the next load sees the new content.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the manifest text at `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, xml: impl Into<String>) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(path.into(), xml.into());
    }

    /// Forget the manifest at `path`.
    pub fn remove(&self, path: &Path) -> bool {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.remove(path).is_some()
    }

    pub fn contains(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.contains_key(path)
    }
}

impl ManifestSource for MemorySource {
    fn load(&self, path: &Path) -> Result<PomMap, SourceError> {
        let content = {
            let files = self.files.read().unwrap_or_else(|e| e.into_inner());
            files.get(path).cloned()
        };
        match content {
            Some(content) => parse(path, &content),
            None => Err(SourceError::Unreadable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such manifest"),
            }),
        }
    }
}

fn parse(path: &Path, content: &str) -> Result<PomMap, SourceError> {
    parse_tree(content).map_err(|e| SourceError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
