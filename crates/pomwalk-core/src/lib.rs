//! Core data types for pomwalk.
//!
//! Maven coordinates, ordered property tables with `${...}` expansion, the
//! parsed-manifest tree and its typed view, user configuration, and the
//! collaborator traits (manifest source, change watcher) the resolver is
//! built against.
//!
//! This crate is intentionally free of async code and I/O beyond reading
//! the config file.

pub mod config;
pub mod coordinate;
pub mod document;
pub mod properties;
pub mod source;
pub mod tree;
