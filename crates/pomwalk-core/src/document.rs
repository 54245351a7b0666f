//! Typed view of a parsed manifest tree.

use thiserror::Error;

use crate::coordinate::{Coordinate, DEFAULT_TYPE, POM_TYPE};
use crate::tree::{PomMap, PomValue};

/// The manifest tree has no usable `project` element.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("missing <project> root element")]
    MissingProject,
}

/// The declared (unresolved) content of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDocument {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    /// Declared properties in document order.
    pub properties: Vec<(String, String)>,
    pub dependency_management: Vec<DeclaredDependency>,
    pub dependencies: Vec<DeclaredDependency>,
    pub modules: Vec<String>,
}

/// Reference to a parent manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.version).with_type(POM_TYPE)
    }
}

/// A dependency or dependency-management entry as written in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub type_: Option<String>,
    pub optional: bool,
}

impl DeclaredDependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    fn from_node(node: &PomMap) -> Self {
        Self {
            group_id: node.text("groupId").unwrap_or_default().to_string(),
            artifact_id: node.text("artifactId").unwrap_or_default().to_string(),
            version: non_empty(node.text("version")),
            scope: non_empty(node.text("scope")),
            type_: non_empty(node.text("type")),
            optional: node.text("optional").is_some_and(|v| v.trim() == "true"),
        }
    }
}

impl PomDocument {
    /// Extract the typed view from a parsed tree rooted above `project`.
    pub fn from_tree(tree: &PomMap) -> Result<Self, DocumentError> {
        let project = tree.node("project").ok_or(DocumentError::MissingProject)?;

        let parent = project.node("parent").map(|p| ParentRef {
            group_id: p.text("groupId").unwrap_or_default().to_string(),
            artifact_id: p.text("artifactId").unwrap_or_default().to_string(),
            version: p.text("version").unwrap_or_default().to_string(),
        });

        // Only single-valued text properties are meaningful.
        let properties = project
            .node("properties")
            .map(|props| {
                props
                    .iter()
                    .filter_map(|(key, values)| match values {
                        [PomValue::Text(value)] => Some((key.to_string(), value.clone())),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            group_id: non_empty(project.text("groupId")),
            artifact_id: non_empty(project.text("artifactId")),
            version: non_empty(project.text("version")),
            packaging: non_empty(project.text("packaging")),
            parent,
            properties,
            dependency_management: declared(
                project.at(&["dependencyManagement", "dependencies", "dependency"]),
            ),
            dependencies: declared(project.at(&["dependencies", "dependency"])),
            modules: project
                .at(&["modules", "module"])
                .iter()
                .filter_map(PomValue::as_text)
                .map(str::to_string)
                .collect(),
        })
    }

    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Declared packaging, or `jar`.
    pub fn packaging(&self) -> &str {
        self.packaging.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    /// Look up a declared property by key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn declared(values: &[PomValue]) -> Vec<DeclaredDependency> {
    values
        .iter()
        .filter_map(PomValue::as_node)
        .map(DeclaredDependency::from_node)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
