use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use pomwalk_core::coordinate::Coordinate;

/// Failures recorded by the engine while resolving manifests.
///
/// None of these unwind through resolution; they are collected on the
/// engine and the affected manifest is left where it stopped.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ResolveError {
    #[error("cannot read manifest of {coordinate} at {}: {message}", path.display())]
    #[diagnostic(help("Check that the artifact is installed in the local repository"))]
    Unreadable {
        coordinate: Coordinate,
        path: PathBuf,
        message: String,
    },

    #[error("malformed manifest of {coordinate} at {}: {message}", path.display())]
    #[diagnostic(help("Fix the manifest; it is re-read on the next reload"))]
    Malformed {
        coordinate: Coordinate,
        path: PathBuf,
        message: String,
    },

    /// A coordinate still lacks a part after every lookup.
    #[error("{owner}: unresolved {field} in {coordinate}")]
    Unresolved {
        owner: Coordinate,
        coordinate: Coordinate,
        field: String,
    },

    #[error("cyclic manifest chain: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// Reported after the engine went idle with the manifest incomplete.
    #[error("{coordinate} did not resolve: {reason}")]
    Stalled { coordinate: Coordinate, reason: String },
}
