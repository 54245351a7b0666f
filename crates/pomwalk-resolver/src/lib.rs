//! Manifest resolution engine: a staged pipeline per manifest that resolves
//! parent inheritance, properties, dependency management and dependencies,
//! then flattens everything into a de-duplicated classpath.

pub mod classpath;
pub mod conflict;
pub mod coordinates;
pub mod engine;
pub mod error;
pub mod graph;
pub mod manifest;
mod pipeline;
pub mod properties;
pub mod registry;
pub mod workspace;

pub use engine::{Engine, EngineOptions};
pub use error::ResolveError;
pub use manifest::{Manifest, ManifestId, Phase};
