//! Shared utilities for pomwalk.
//!
//! Cross-cutting concerns used by the other pomwalk crates: the unified
//! error type, filesystem helpers, and terminal status/progress output.

pub mod errors;
pub mod fs;
pub mod progress;
