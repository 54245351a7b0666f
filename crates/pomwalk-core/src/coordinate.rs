use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Scope applied when neither the declaration nor any management table names one.
pub const DEFAULT_SCOPE: &str = "compile";

/// Scope whose dependencies never propagate transitively.
pub const TEST_SCOPE: &str = "test";

/// Packaging / dependency type used when none is declared.
pub const DEFAULT_TYPE: &str = "jar";

/// Type used for parent manifests.
pub const POM_TYPE: &str = "pom";

/// Marker of a `${...}` placeholder that survived interpolation.
pub const PLACEHOLDER_START: &str = "${";

/// A Maven artifact coordinate.
///
/// Identity is `group_id:artifact_id:version` only; `type_`, `scope` and
/// `optional` are attributes carried along and never affect equality or
/// hashing.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub scope: String,
    pub optional: bool,
}

impl Coordinate {
    /// A coordinate with default type, scope and optionality.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            type_: DEFAULT_TYPE.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            optional: false,
        }
    }

    /// Parse `"group:artifact:version"` into a coordinate.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [g, a, v] if !g.is_empty() && !a.is_empty() && !v.is_empty() => {
                Some(Self::new(*g, *a, *v))
            }
            _ => None,
        }
    }

    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = type_.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Registry key: `group:artifact:version`.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// `group:artifact` identifier (without version), used for classpath de-duplication.
    pub fn artifact_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn is_test_scoped(&self) -> bool {
        self.scope == TEST_SCOPE
    }

    /// A degraded coordinate is missing a part or still holds a placeholder.
    /// It is representable but can never be loaded.
    pub fn is_degraded(&self) -> bool {
        [&self.group_id, &self.artifact_id, &self.version]
            .iter()
            .any(|part| part.is_empty() || part.contains(PLACEHOLDER_START))
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.version == other.version
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = if self.version.is_empty() {
            "?"
        } else {
            self.version.as_str()
        };
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version)
    }
}
