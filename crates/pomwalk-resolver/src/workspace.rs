//! The project-owned manifests.

use pomwalk_core::coordinate::Coordinate;

use crate::registry::ManifestHandle;

/// Ordered set of the manifests opened from the project, as opposed to those
/// pulled in from the repository. Members are never removed.
#[derive(Debug, Default)]
pub struct Workspace {
    members: Vec<ManifestHandle>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member unless one with an equal coordinate is already present.
    pub fn add(&mut self, handle: ManifestHandle) -> bool {
        if self.contains(&handle.coordinate).is_some() {
            return false;
        }
        self.members.push(handle);
        true
    }

    /// The stored member whose coordinate equals `coordinate`.
    pub fn contains(&self, coordinate: &Coordinate) -> Option<&ManifestHandle> {
        self.members.iter().find(|m| m.coordinate == *coordinate)
    }

    /// The first member added, normally the project root.
    pub fn root(&self) -> Option<&ManifestHandle> {
        self.members.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestHandle> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestId;

    fn member(id: usize, g: &str, a: &str, v: &str) -> ManifestHandle {
        ManifestHandle {
            id: ManifestId(id),
            coordinate: Coordinate::new(g, a, v),
        }
    }

    #[test]
    fn add_keeps_order_and_skips_duplicates() {
        let mut ws = Workspace::new();
        assert!(ws.add(member(0, "org", "root", "1")));
        assert!(ws.add(member(1, "org", "core", "1")));
        assert!(!ws.add(member(5, "org", "core", "1")));
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.root().unwrap().coordinate.artifact_id, "root");
    }

    #[test]
    fn contains_returns_stored_instance() {
        let mut ws = Workspace::new();
        ws.add(member(3, "org", "core", "1"));
        let lookup = Coordinate::new("org", "core", "1").with_type("pom");
        assert_eq!(ws.contains(&lookup).unwrap().id, ManifestId(3));
        assert!(ws.contains(&Coordinate::new("org", "core", "2")).is_none());
    }
}
