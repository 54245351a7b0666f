//! Seams for the collaborators the resolver depends on but does not implement.

use std::path::{Path, PathBuf};

use thiserror::Error;

use pomwalk_util::errors::PomwalkError;

use crate::tree::PomMap;

/// Failure to turn a manifest path into a parsed tree.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but its markup is invalid.
    #[error("malformed manifest {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Reads and parses manifests. Called off the resolver's thread of control,
/// so implementations must be shareable.
pub trait ManifestSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<PomMap, SourceError>;
}

/// Registers interest in a manifest file. Change notifications travel back
/// to the resolver through whatever channel the implementation was built
/// with; the resolver calls `watch` at most once per manifest.
pub trait ChangeWatcher {
    fn watch(&mut self, path: &Path) -> Result<(), PomwalkError>;
}

/// A watcher that ignores every registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWatcher;

impl ChangeWatcher for NoopWatcher {
    fn watch(&mut self, _path: &Path) -> Result<(), PomwalkError> {
        Ok(())
    }
}
