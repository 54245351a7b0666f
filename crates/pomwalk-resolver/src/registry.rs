//! Memoization of manifests by coordinate key.

use std::collections::HashMap;

use pomwalk_core::coordinate::{Coordinate, PLACEHOLDER_START};

use crate::manifest::ManifestId;

/// A registered manifest: its arena index and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestHandle {
    pub id: ManifestId,
    pub coordinate: Coordinate,
}

/// Registry lookup by key string or by coordinate value.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Key(&'a str),
    Value(&'a Coordinate),
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(key: &'a str) -> Self {
        Lookup::Key(key)
    }
}

impl<'a> From<&'a Coordinate> for Lookup<'a> {
    fn from(coordinate: &'a Coordinate) -> Self {
        Lookup::Value(coordinate)
    }
}

/// Append-only map from `group:artifact:version` to the one canonical
/// manifest for that coordinate.
#[derive(Debug, Default)]
pub struct ManifestRegistry {
    entries: HashMap<String, ManifestHandle>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert `handle` under `key`.
    ///
    /// Existing keys are never overwritten and keys that still hold a
    /// placeholder or lack a coordinate part are refused; both cases log a
    /// warning and return `false`.
    pub fn put(&mut self, key: &str, handle: ManifestHandle) -> bool {
        if key.contains(PLACEHOLDER_START) || Coordinate::parse(key).is_none() {
            tracing::warn!("refusing to register manifest under malformed key '{key}'");
            return false;
        }
        if self.entries.contains_key(key) {
            tracing::warn!("manifest '{key}' is already registered; keeping the existing entry");
            return false;
        }
        self.entries.insert(key.to_string(), handle);
        true
    }

    pub fn get(&self, key: &str) -> Option<&ManifestHandle> {
        self.entries.get(key)
    }

    /// The stored entry matching a key, or the one whose coordinate equals
    /// the given value.
    pub fn contains<'a>(&self, lookup: impl Into<Lookup<'a>>) -> Option<&ManifestHandle> {
        match lookup.into() {
            Lookup::Key(key) => self.get(key),
            Lookup::Value(coordinate) => self
                .entries
                .values()
                .find(|handle| handle.coordinate == *coordinate),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestHandle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: usize, key: &str) -> ManifestHandle {
        ManifestHandle {
            id: ManifestId(id),
            coordinate: Coordinate::parse(key).unwrap(),
        }
    }

    #[test]
    fn put_then_get() {
        let mut registry = ManifestRegistry::new();
        assert!(registry.put("org:lib:1.0", handle(0, "org:lib:1.0")));
        assert!(registry.has("org:lib:1.0"));
        assert_eq!(registry.get("org:lib:1.0").unwrap().id, ManifestId(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn put_never_overwrites() {
        let mut registry = ManifestRegistry::new();
        assert!(registry.put("org:lib:1.0", handle(0, "org:lib:1.0")));
        assert!(!registry.put("org:lib:1.0", handle(7, "org:lib:1.0")));
        assert_eq!(registry.get("org:lib:1.0").unwrap().id, ManifestId(0));
    }

    #[test]
    fn put_refuses_malformed_keys() {
        let mut registry = ManifestRegistry::new();
        let h = handle(0, "org:lib:1.0");
        assert!(!registry.put("org:lib:${lib.version}", h.clone()));
        assert!(!registry.put("org:lib:", h.clone()));
        assert!(!registry.put("org:lib", h));
        assert!(registry.is_empty());
    }

    #[test]
    fn contains_by_key_and_value() {
        let mut registry = ManifestRegistry::new();
        registry.put("org:lib:1.0", handle(0, "org:lib:1.0"));

        registry.put("org:app:1.0", handle(1, "org:app:1.0"));

        assert_eq!(registry.contains("org:lib:1.0").map(|h| h.id), Some(ManifestId(0)));
        assert!(registry.contains("org:lib:2.0").is_none());

        // Scope and type are not part of identity.
        let same = Coordinate::new("org", "app", "1.0").with_scope("test");
        let found = registry.contains(&same).unwrap();
        assert_eq!(found.id, ManifestId(1));
        assert_eq!(found.coordinate.scope, "compile");
        let other = Coordinate::new("org", "lib", "2.0");
        assert!(registry.contains(&other).is_none());
    }
}
