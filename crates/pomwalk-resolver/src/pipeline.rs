//! Phase transitions of the per-manifest state machine:
//!
//! ```text
//! created -> parent resolved -> properties resolved
//!         -> dependency management resolved -> dependencies resolved
//!         -> classpath resolved
//! ```
//!
//! Each transition is one [`Step`]. A step either queues the next one or
//! parks the manifest on a [`Wait`] that a later completion releases.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use pomwalk_core::coordinate::{Coordinate, POM_TYPE};
use pomwalk_core::document::DeclaredDependency;
use pomwalk_core::properties::interpolate_with;

use crate::classpath::build_classpath;
use crate::coordinates::CoordinateResolver;
use crate::engine::{Engine, Step};
use crate::error::ResolveError;
use crate::manifest::{ManifestId, Phase, ResolvedDependency, Wait};
use crate::properties::build_property_table;

impl Step {
    fn id(self) -> ManifestId {
        match self {
            Step::Load(id)
            | Step::Parent(id)
            | Step::Properties(id)
            | Step::DependencyManagement(id)
            | Step::Dependencies(id)
            | Step::Classpath(id) => id,
        }
    }

    /// The phase a manifest must be in for this step to apply.
    fn entry_phase(self) -> Phase {
        match self {
            Step::Load(_) | Step::Parent(_) => Phase::Created,
            Step::Properties(_) => Phase::ParentResolved,
            Step::DependencyManagement(_) => Phase::PropertiesResolved,
            Step::Dependencies(_) => Phase::DependencyManagementResolved,
            Step::Classpath(_) => Phase::DependenciesResolved,
        }
    }
}

impl Engine {
    pub(crate) fn apply(&mut self, step: Step) {
        let id = step.id();
        let Some(manifest) = self.manifests.get(id.0) else {
            return;
        };
        if manifest.failure.is_some() {
            tracing::debug!("skipping {step:?} for failed manifest {}", manifest.coordinate);
            return;
        }
        // A rewind or restart since the step was queued makes it stale.
        if manifest.phase != step.entry_phase() {
            tracing::trace!("dropping stale {step:?} for {}", manifest.coordinate);
            return;
        }
        match step {
            Step::Load(id) => self.spawn_read(id),
            Step::Parent(id) => self.resolve_parent(id),
            Step::Properties(id) => self.resolve_properties(id),
            Step::DependencyManagement(id) => self.resolve_dependency_management(id),
            Step::Dependencies(id) => self.resolve_dependencies(id),
            Step::Classpath(id) => self.resolve_classpath(id),
        }
    }

    /// `created -> parent resolved`: link the declared parent and wait for
    /// it to settle.
    fn resolve_parent(&mut self, id: ManifestId) {
        let manifest = &self.manifests[id.0];
        let Some(document) = manifest.document.as_ref() else {
            return;
        };
        let owner = manifest.coordinate.clone();
        let declared = document.parent.as_ref().map(|parent| {
            let expand = |value: &str| {
                interpolate_with(value, |key| document.property(key).map(str::to_string))
            };
            Coordinate::new(
                expand(&parent.group_id),
                expand(&parent.artifact_id),
                expand(&parent.version),
            )
            .with_type(POM_TYPE)
        });

        let parent = match declared {
            Some(coordinate) if coordinate.is_degraded() => {
                let error = ResolveError::Unresolved {
                    owner,
                    coordinate,
                    field: "parent".to_string(),
                };
                tracing::warn!("{error}; continuing without a parent");
                self.errors.push(error);
                None
            }
            Some(coordinate) => Some(self.obtain(coordinate)),
            None => None,
        };

        if let Some(parent) = parent {
            if let Some(chain) = self.find_chain(parent, id) {
                let chain = self.chain_names(id, &chain);
                self.fail(id, ResolveError::Cycle { chain });
                return;
            }
        }

        let previous = self.manifests[id.0].parent;
        if let Some(previous) = previous.filter(|p| Some(*p) != parent) {
            self.manifests[previous.0].children.retain(|c| *c != id);
        }
        self.manifests[id.0].parent = parent;

        if let Some(parent) = parent {
            let parent_manifest = &mut self.manifests[parent.0];
            if !parent_manifest.children.contains(&id) {
                parent_manifest.children.push(id);
            }
            if parent_manifest.changing {
                self.manifests[id.0].waiting = Wait::Parent(parent);
                return;
            }
        }
        self.parent_resolved(id);
    }

    fn parent_resolved(&mut self, id: ManifestId) {
        let manifest = &mut self.manifests[id.0];
        manifest.waiting = Wait::Idle;
        manifest.phase = Phase::ParentResolved;
        self.queue.push_back(Step::Properties(id));
    }

    /// `parent resolved -> properties resolved`.
    fn resolve_properties(&mut self, id: ManifestId) {
        let manifest = &self.manifests[id.0];
        let Some(document) = manifest.document.as_ref() else {
            return;
        };
        let parent = manifest.parent.map(|p| &self.manifests[p.0].coordinate);
        let table = build_property_table(
            &manifest.coordinate,
            document,
            parent,
            &self.options.environment,
        );

        let manifest = &mut self.manifests[id.0];
        manifest.properties = table;
        manifest.phase = Phase::PropertiesResolved;
        self.queue.push_back(Step::DependencyManagement(id));
    }

    /// `properties resolved -> dependency management resolved`: interpolate
    /// every managed entry. Nothing is loaded.
    fn resolve_dependency_management(&mut self, id: ManifestId) {
        let Some(document) = self.manifests[id.0].document.as_ref() else {
            return;
        };
        let resolver = CoordinateResolver::new(&self.manifests);
        let expand = |value: &Option<String>| {
            value.as_deref().map(|v| resolver.interpolate(id, v))
        };
        let managed: Vec<DeclaredDependency> = document
            .dependency_management
            .iter()
            .map(|d| DeclaredDependency {
                group_id: resolver.interpolate(id, &d.group_id),
                artifact_id: resolver.interpolate(id, &d.artifact_id),
                version: expand(&d.version),
                scope: expand(&d.scope),
                type_: expand(&d.type_),
                optional: d.optional,
            })
            .collect();

        let manifest = &mut self.manifests[id.0];
        manifest.dependency_management = managed;
        manifest.phase = Phase::DependencyManagementResolved;
        self.queue.push_back(Step::Dependencies(id));
    }

    /// `dependency management resolved -> dependencies resolved`: resolve and
    /// obtain every dependency, then wait until each one is complete.
    fn resolve_dependencies(&mut self, id: ManifestId) {
        let Some(document) = self.manifests[id.0].document.as_ref() else {
            return;
        };
        let coordinates: Vec<Coordinate> = {
            let resolver = CoordinateResolver::new(&self.manifests);
            document
                .dependencies
                .iter()
                .map(|d| resolver.resolve(id, d))
                .collect()
        };
        let owner = self.manifests[id.0].coordinate.clone();

        let previous: Vec<ManifestId> = self.manifests[id.0]
            .dependencies
            .iter()
            .filter_map(|d| d.manifest)
            .collect();
        for dependency in previous {
            self.manifests[dependency.0].dependants.retain(|d| *d != id);
        }

        let mut resolved = Vec::with_capacity(coordinates.len());
        let mut pending = BTreeSet::new();
        for coordinate in coordinates {
            if coordinate.is_degraded() {
                let field = if coordinate.version.is_empty() {
                    "version"
                } else {
                    "coordinate"
                };
                let error = ResolveError::Unresolved {
                    owner: owner.clone(),
                    coordinate: coordinate.clone(),
                    field: field.to_string(),
                };
                tracing::warn!("{error}");
                self.errors.push(error);
                resolved.push(ResolvedDependency {
                    coordinate,
                    manifest: None,
                });
                continue;
            }

            let dependency = self.obtain(coordinate.clone());
            if let Some(chain) = self.find_chain(dependency, id) {
                let error = ResolveError::Cycle {
                    chain: self.chain_names(id, &chain),
                };
                tracing::warn!("{error}; dropping the closing edge");
                self.errors.push(error);
                resolved.push(ResolvedDependency {
                    coordinate,
                    manifest: None,
                });
                continue;
            }

            let dependency_manifest = &mut self.manifests[dependency.0];
            if !dependency_manifest.dependants.contains(&id) {
                dependency_manifest.dependants.push(id);
            }
            if !dependency_manifest.complete {
                pending.insert(dependency);
            }
            resolved.push(ResolvedDependency {
                coordinate,
                manifest: Some(dependency),
            });
        }

        let manifest = &mut self.manifests[id.0];
        manifest.dependencies = resolved;
        if pending.is_empty() {
            self.dependencies_resolved(id);
        } else {
            manifest.waiting = Wait::Dependencies(pending);
        }
    }

    fn dependencies_resolved(&mut self, id: ManifestId) {
        let manifest = &mut self.manifests[id.0];
        manifest.waiting = Wait::Idle;
        manifest.phase = Phase::DependenciesResolved;
        self.queue.push_back(Step::Classpath(id));
    }

    /// `dependencies resolved -> classpath resolved`: the terminal transition.
    fn resolve_classpath(&mut self, id: ManifestId) {
        let built = build_classpath(&self.manifests, id, &self.repository);

        let manifest = &mut self.manifests[id.0];
        manifest.classpath = built.entries;
        manifest.conflicts = built.conflicts;
        manifest.phase = Phase::ClasspathResolved;
        manifest.waiting = Wait::Idle;
        manifest.changing = false;
        manifest.complete = true;
        tracing::debug!(
            "resolved {} ({} classpath entries)",
            manifest.coordinate,
            manifest.classpath.len()
        );

        if let Some(callbacks) = self.callbacks.remove(&id) {
            for callback in callbacks {
                callback(&self.manifests[id.0]);
            }
        }

        self.fan_out(id);

        if self.manifests[id.0].has_changed {
            self.reload(id);
        }
    }

    /// Release or re-run everything that builds on `id`: every child re-runs
    /// from dependency management, dependants rebuild their classpath.
    ///
    /// A child still before its dependency management step, or still being
    /// read, picks up the new values on its own.
    fn fan_out(&mut self, id: ManifestId) {
        let children = self.manifests[id.0].children.clone();
        for child in children {
            let manifest = &mut self.manifests[child.0];
            if manifest.failure.is_some() || manifest.waiting == Wait::Reading {
                continue;
            }
            if manifest.waiting == Wait::Parent(id) {
                self.parent_resolved(child);
            } else if manifest.phase >= Phase::DependencyManagementResolved {
                manifest.rewind(Phase::PropertiesResolved);
                self.queue.push_back(Step::DependencyManagement(child));
            }
        }

        let dependants = self.manifests[id.0].dependants.clone();
        for dependant in dependants {
            let manifest = &mut self.manifests[dependant.0];
            let released = match &mut manifest.waiting {
                Wait::Dependencies(pending) => {
                    pending.remove(&id);
                    pending.is_empty()
                }
                _ => false,
            };
            if released {
                self.dependencies_resolved(dependant);
            } else if manifest.complete {
                manifest.rewind(Phase::DependenciesResolved);
                self.queue.push_back(Step::Classpath(dependant));
            }
        }
    }

    /// Shortest path from `from` to `to` over parent and dependency links,
    /// both ends included.
    pub(crate) fn find_chain(&self, from: ManifestId, to: ManifestId) -> Option<Vec<ManifestId>> {
        let mut previous: HashMap<ManifestId, ManifestId> = HashMap::new();
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut chain = vec![current];
                let mut node = current;
                while let Some(&prev) = previous.get(&node) {
                    chain.push(prev);
                    node = prev;
                }
                chain.reverse();
                return Some(chain);
            }
            let manifest = &self.manifests[current.0];
            let links = manifest
                .parent
                .into_iter()
                .chain(manifest.dependencies.iter().filter_map(|d| d.manifest));
            for next in links {
                if visited.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn chain_names(&self, start: ManifestId, chain: &[ManifestId]) -> Vec<String> {
        std::iter::once(&start)
            .chain(chain)
            .map(|id| self.manifests[id.0].coordinate.to_string())
            .collect()
    }
}
