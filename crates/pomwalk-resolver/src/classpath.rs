//! Flattening a resolved manifest into its classpath.

use std::collections::HashMap;

use pomwalk_core::coordinate::Coordinate;
use pomwalk_maven::repository::LocalRepository;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::manifest::{ClasspathEntry, Manifest, ManifestId, ResolvedDependency};

/// The outcome of one classpath build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    pub entries: Vec<ClasspathEntry>,
    pub conflicts: ConflictReport,
}

/// Accumulates entries, keeping the first occurrence of each `group:artifact`.
struct Builder {
    classpath: Classpath,
    seen: HashMap<String, usize>,
    /// The artifact being built never lands on its own classpath.
    own: String,
}

impl Builder {
    fn new(own: String) -> Self {
        Self {
            classpath: Classpath::default(),
            seen: HashMap::new(),
            own,
        }
    }

    fn offer(&mut self, entry: ClasspathEntry, reason: impl FnOnce() -> String) {
        let key = entry.coordinate.artifact_key();
        if key == self.own {
            return;
        }
        match self.seen.get(&key) {
            Some(&index) => {
                let kept = &self.classpath.entries[index].coordinate;
                if kept.version != entry.coordinate.version {
                    self.classpath.conflicts.add(VersionConflict {
                        group: entry.coordinate.group_id.clone(),
                        artifact: entry.coordinate.artifact_id.clone(),
                        requested: entry.coordinate.version.clone(),
                        resolved: kept.version.clone(),
                        reason: reason(),
                    });
                }
            }
            None => {
                self.seen.insert(key, self.classpath.entries.len());
                self.classpath.entries.push(entry);
            }
        }
    }
}

/// Build the classpath of `id` from four passes, first `group:artifact` wins:
///
/// 1. its own direct dependencies,
/// 2. its parent's direct dependencies,
/// 3. the classpath of each direct dependency that is neither test-scoped
///    nor optional, minus test-scoped and optional entries,
/// 4. its parent's classpath.
///
/// Degraded coordinates cannot be located and are left out, and so is the
/// manifest's own artifact.
pub fn build_classpath(
    manifests: &[Manifest],
    id: ManifestId,
    repository: &LocalRepository,
) -> Classpath {
    let Some(manifest) = manifests.get(id.0) else {
        return Classpath::default();
    };
    let mut builder = Builder::new(manifest.coordinate.artifact_key());
    let parent = manifest.parent.and_then(|p| manifests.get(p.0));

    for dependency in &manifest.dependencies {
        if let Some(entry) = direct_entry(dependency, &manifest.coordinate, repository) {
            builder.offer(entry, || "declared directly".to_string());
        }
    }

    if let Some(parent) = parent {
        for dependency in &parent.dependencies {
            if let Some(entry) = direct_entry(dependency, &parent.coordinate, repository) {
                builder.offer(entry, || format!("declared by parent {}", parent.coordinate));
            }
        }
    }

    for dependency in &manifest.dependencies {
        let coordinate = &dependency.coordinate;
        if coordinate.is_test_scoped() || coordinate.optional {
            continue;
        }
        let Some(transitive) = dependency.manifest.and_then(|d| manifests.get(d.0)) else {
            continue;
        };
        for entry in &transitive.classpath {
            if entry.coordinate.is_test_scoped() || entry.coordinate.optional {
                continue;
            }
            builder.offer(entry.clone(), || format!("transitive via {coordinate}"));
        }
    }

    if let Some(parent) = parent {
        for entry in &parent.classpath {
            builder.offer(entry.clone(), || {
                format!("inherited from parent {}", parent.coordinate)
            });
        }
    }

    builder.classpath
}

fn direct_entry(
    dependency: &ResolvedDependency,
    source: &Coordinate,
    repository: &LocalRepository,
) -> Option<ClasspathEntry> {
    let coordinate = &dependency.coordinate;
    if coordinate.is_degraded() {
        return None;
    }
    Some(ClasspathEntry {
        coordinate: coordinate.clone(),
        file: repository.locate(coordinate, &coordinate.type_),
        source: source.clone(),
    })
}
