//! Turning declared dependencies into fully-qualified coordinates.

use std::collections::HashSet;

use pomwalk_core::coordinate::{Coordinate, DEFAULT_SCOPE, DEFAULT_TYPE};
use pomwalk_core::document::DeclaredDependency;
use pomwalk_core::properties::interpolate_with;

use crate::manifest::{Manifest, ManifestId};

/// An attribute that can be inherited from dependency management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Version,
    Scope,
    Type,
}

impl Attribute {
    fn of(self, dependency: &DeclaredDependency) -> Option<&String> {
        match self {
            Attribute::Version => dependency.version.as_ref(),
            Attribute::Scope => dependency.scope.as_ref(),
            Attribute::Type => dependency.type_.as_ref(),
        }
    }
}

/// Resolves declarations against a context manifest and its ancestors.
pub struct CoordinateResolver<'a> {
    manifests: &'a [Manifest],
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(manifests: &'a [Manifest]) -> Self {
        Self { manifests }
    }

    /// Expand `${...}` in `value` from the property tables of `context` and
    /// then its ancestors. Unresolvable placeholders are kept literally.
    pub fn interpolate(&self, context: ManifestId, value: &str) -> String {
        interpolate_with(value, |token| self.property(context, token))
    }

    /// First value of `key` along the ancestor chain starting at `context`.
    pub fn property(&self, context: ManifestId, key: &str) -> Option<String> {
        self.ancestors(context)
            .find_map(|m| m.properties.get(key).map(str::to_string))
    }

    /// Look up an undeclared attribute for `group:artifact`.
    ///
    /// Each manifest on the ancestor chain is searched in turn: its resolved
    /// dependency management first, then the values written on its own
    /// dependency declarations.
    pub fn lookup(
        &self,
        context: ManifestId,
        group: &str,
        artifact: &str,
        attribute: Attribute,
    ) -> Option<String> {
        self.ancestors(context).find_map(|m| {
            let managed = m
                .dependency_management
                .iter()
                .filter(|d| d.group_id == group && d.artifact_id == artifact)
                .find_map(|d| attribute.of(d).cloned());
            managed.or_else(|| {
                let document = m.document.as_ref()?;
                document
                    .dependencies
                    .iter()
                    .filter(|d| {
                        self.interpolate(m.id, &d.group_id) == group
                            && self.interpolate(m.id, &d.artifact_id) == artifact
                    })
                    .find_map(|d| attribute.of(d))
                    .map(|value| self.interpolate(m.id, value))
            })
        })
    }

    /// Produce the coordinate for `declared` in the context of `context`.
    ///
    /// Declared values win, then inherited ones; scope falls back to
    /// `compile` and type to `jar`. A version that cannot be found is left
    /// empty, which makes the coordinate degraded.
    pub fn resolve(&self, context: ManifestId, declared: &DeclaredDependency) -> Coordinate {
        let group = self.interpolate(context, &declared.group_id);
        let artifact = self.interpolate(context, &declared.artifact_id);

        let inherit = |value: &Option<String>, attribute: Attribute| -> Option<String> {
            match value {
                Some(v) => Some(self.interpolate(context, v)),
                None => self.lookup(context, &group, &artifact, attribute),
            }
        };

        let version = inherit(&declared.version, Attribute::Version).unwrap_or_default();
        let scope = inherit(&declared.scope, Attribute::Scope)
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        let type_ =
            inherit(&declared.type_, Attribute::Type).unwrap_or_else(|| DEFAULT_TYPE.to_string());

        Coordinate::new(group, artifact, version)
            .with_scope(scope)
            .with_type(type_)
            .with_optional(declared.optional)
    }

    /// `context`, its parent, its grandparent and so on. Stops early if the
    /// chain loops back on itself.
    fn ancestors(&self, context: ManifestId) -> impl Iterator<Item = &'a Manifest> + '_ {
        let manifests = self.manifests;
        let mut visited = HashSet::new();
        let mut next = Some(context);
        std::iter::from_fn(move || {
            let id = next?;
            if !visited.insert(id) {
                return None;
            }
            let manifest = manifests.get(id.0)?;
            next = manifest.parent;
            Some(manifest)
        })
    }
}
