//! The in-memory, progressively resolved manifest.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use pomwalk_core::coordinate::{Coordinate, DEFAULT_TYPE};
use pomwalk_core::document::{DeclaredDependency, PomDocument};
use pomwalk_core::properties::PropertyTable;

use crate::conflict::ConflictReport;

/// Index of a manifest in the engine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManifestId(pub(crate) usize);

impl ManifestId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pipeline position of a manifest. Each phase names the last transition
/// that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Created,
    ParentResolved,
    PropertiesResolved,
    DependencyManagementResolved,
    DependenciesResolved,
    ClasspathResolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Created => "created",
            Phase::ParentResolved => "parent resolved",
            Phase::PropertiesResolved => "properties resolved",
            Phase::DependencyManagementResolved => "dependency management resolved",
            Phase::DependenciesResolved => "dependencies resolved",
            Phase::ClasspathResolved => "classpath resolved",
        };
        f.write_str(name)
    }
}

/// What an in-flight manifest is blocked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Wait {
    Idle,
    Reading,
    Parent(ManifestId),
    Dependencies(BTreeSet<ManifestId>),
}

/// A direct dependency after coordinate resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    /// The dependency's own manifest; `None` when the coordinate is degraded
    /// or the edge would close a cycle.
    pub manifest: Option<ManifestId>,
}

/// One artifact on a classpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClasspathEntry {
    pub coordinate: Coordinate,
    /// Location of the artifact file in the local repository.
    pub file: PathBuf,
    /// The manifest that declared this entry.
    pub source: Coordinate,
}

/// A manifest as the engine sees it: declared content plus everything the
/// pipeline has resolved so far.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub(crate) id: ManifestId,
    pub(crate) coordinate: Coordinate,
    pub(crate) path: PathBuf,
    pub(crate) document: Option<PomDocument>,
    pub(crate) packaging: String,

    pub(crate) parent: Option<ManifestId>,
    pub(crate) children: Vec<ManifestId>,
    pub(crate) dependants: Vec<ManifestId>,

    pub(crate) properties: PropertyTable,
    pub(crate) dependency_management: Vec<DeclaredDependency>,
    pub(crate) dependencies: Vec<ResolvedDependency>,
    pub(crate) classpath: Vec<ClasspathEntry>,
    pub(crate) conflicts: ConflictReport,

    pub(crate) phase: Phase,
    pub(crate) changing: bool,
    pub(crate) has_changed: bool,
    pub(crate) complete: bool,
    pub(crate) waiting: Wait,
    pub(crate) failure: Option<String>,
    pub(crate) watched: bool,
}

impl Manifest {
    pub(crate) fn new(id: ManifestId, coordinate: Coordinate, path: PathBuf) -> Self {
        Self {
            id,
            coordinate,
            path,
            document: None,
            packaging: DEFAULT_TYPE.to_string(),
            parent: None,
            children: Vec::new(),
            dependants: Vec::new(),
            properties: PropertyTable::new(),
            dependency_management: Vec::new(),
            dependencies: Vec::new(),
            classpath: Vec::new(),
            conflicts: ConflictReport::new(),
            phase: Phase::Created,
            changing: true,
            has_changed: false,
            complete: false,
            waiting: Wait::Reading,
            failure: None,
            watched: false,
        }
    }

    /// Reset run state at the start of a pipeline run.
    pub(crate) fn begin_run(&mut self) {
        self.changing = true;
        self.has_changed = false;
        self.complete = false;
        self.failure = None;
        self.phase = Phase::Created;
    }

    /// Re-enter a completed manifest's pipeline just after `phase`.
    pub(crate) fn rewind(&mut self, phase: Phase) {
        self.changing = true;
        self.complete = false;
        self.waiting = Wait::Idle;
        self.phase = phase;
    }

    pub fn id(&self) -> ManifestId {
        self.id
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// The backing manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The declared content, once a read has succeeded.
    pub fn document(&self) -> Option<&PomDocument> {
        self.document.as_ref()
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn parent(&self) -> Option<ManifestId> {
        self.parent
    }

    pub fn children(&self) -> &[ManifestId] {
        &self.children
    }

    pub fn dependants(&self) -> &[ManifestId] {
        &self.dependants
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Interpolated dependency-management entries.
    pub fn dependency_management(&self) -> &[DeclaredDependency] {
        &self.dependency_management
    }

    pub fn dependencies(&self) -> &[ResolvedDependency] {
        &self.dependencies
    }

    /// The classpath, only while the manifest is complete.
    pub fn classpath(&self) -> Option<&[ClasspathEntry]> {
        self.complete.then_some(self.classpath.as_slice())
    }

    /// Versions dropped by first-wins de-duplication on the last classpath build.
    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// A pipeline run is in flight.
    pub fn is_changing(&self) -> bool {
        self.changing
    }

    /// A reload arrived mid-run and will be applied once the run completes.
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Why the last run stopped, if it failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

/// Manifests are the same entity when their coordinates are equal.
impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate
    }
}

impl Eq for Manifest {}
