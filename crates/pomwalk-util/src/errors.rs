use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for pomwalk operations outside the resolution engine.
#[derive(Debug, Error, Diagnostic)]
pub enum PomwalkError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest could not be located, read or understood.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check that pom.xml exists and is well-formed XML"))]
    Manifest { message: String },

    /// Resolution finished without a complete classpath.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// The user configuration file is unreadable or invalid.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.pomwalk/config.toml"))]
    Config { message: String },

    /// File watching could not be set up.
    #[error("Watch error: {message}")]
    Watch { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PomwalkResult<T> = miette::Result<T>;
