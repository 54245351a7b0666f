//! The resolution engine: owns every manifest, drives their pipelines and
//! performs manifest reads concurrently.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use pomwalk_core::config::PomwalkConfig;
use pomwalk_core::coordinate::Coordinate;
use pomwalk_core::document::PomDocument;
use pomwalk_core::properties::{environment_properties, interpolate_with, Property};
use pomwalk_core::source::{ChangeWatcher, ManifestSource, NoopWatcher, SourceError};
use pomwalk_core::tree::PomMap;
use pomwalk_maven::repository::LocalRepository;

use crate::error::ResolveError;
use crate::graph::DependencyGraph;
use crate::manifest::{ClasspathEntry, Manifest, ManifestId, Wait};
use crate::registry::{ManifestHandle, ManifestRegistry};
use crate::workspace::Workspace;

/// Default upper bound on manifest reads in flight.
pub const MAX_CONCURRENT_READS: usize = 8;

/// Callback run once when a manifest completes.
pub type ResolvedCallback = Box<dyn FnOnce(&Manifest) + Send>;

type ReadOutcome = (ManifestId, Result<PomMap, SourceError>);

/// Tunables for an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub max_concurrent_reads: usize,
    /// `env.*` entries placed at the front of every property table.
    pub environment: Vec<Property>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_concurrent_reads: MAX_CONCURRENT_READS,
            environment: environment_properties(std::env::vars()),
        }
    }
}

impl EngineOptions {
    /// Options with no environment properties.
    pub fn isolated() -> Self {
        Self {
            max_concurrent_reads: MAX_CONCURRENT_READS,
            environment: Vec::new(),
        }
    }

    pub fn from_config(config: &PomwalkConfig) -> Self {
        let environment = if config.resolve.environment {
            environment_properties(std::env::vars())
        } else {
            Vec::new()
        };
        Self {
            max_concurrent_reads: config.resolve.max_concurrent_reads.max(1),
            environment,
        }
    }
}

/// One unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Load(ManifestId),
    Parent(ManifestId),
    Properties(ManifestId),
    DependencyManagement(ManifestId),
    Dependencies(ManifestId),
    Classpath(ManifestId),
}

/// A manifest left incomplete once the engine went idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stall {
    pub id: ManifestId,
    pub coordinate: Coordinate,
    pub reason: String,
}

impl Stall {
    pub fn into_error(self) -> ResolveError {
        ResolveError::Stalled {
            coordinate: self.coordinate,
            reason: self.reason,
        }
    }
}

/// Owns all manifest state. Every mutation happens on the caller's task;
/// only the reads themselves run elsewhere.
pub struct Engine {
    pub(crate) repository: LocalRepository,
    source: Arc<dyn ManifestSource>,
    pub(crate) options: EngineOptions,
    pub(crate) watcher: Box<dyn ChangeWatcher + Send>,

    pub(crate) manifests: Vec<Manifest>,
    pub(crate) registry: ManifestRegistry,
    workspace: Workspace,

    pub(crate) queue: VecDeque<Step>,
    reads: JoinSet<ReadOutcome>,
    semaphore: Arc<Semaphore>,
    pub(crate) callbacks: HashMap<ManifestId, Vec<ResolvedCallback>>,
    pub(crate) errors: Vec<ResolveError>,
}

impl Engine {
    pub fn new(repository: LocalRepository, source: Arc<dyn ManifestSource>) -> Self {
        Self::with_options(repository, source, EngineOptions::default())
    }

    pub fn with_options(
        repository: LocalRepository,
        source: Arc<dyn ManifestSource>,
        options: EngineOptions,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(options.max_concurrent_reads.max(1)));
        Self {
            repository,
            source,
            options,
            watcher: Box::new(NoopWatcher),
            manifests: Vec::new(),
            registry: ManifestRegistry::new(),
            workspace: Workspace::new(),
            queue: VecDeque::new(),
            reads: JoinSet::new(),
            semaphore,
            callbacks: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Install the collaborator that watches manifest files. Manifests
    /// already loaded are not re-registered.
    pub fn set_watcher(&mut self, watcher: Box<dyn ChangeWatcher + Send>) {
        self.watcher = watcher;
    }

    pub fn repository(&self) -> &LocalRepository {
        &self.repository
    }

    /// The canonical manifest for `coordinate`, creating and scheduling it
    /// on first request. The manifest file is looked up in the local
    /// repository.
    pub fn obtain(&mut self, coordinate: Coordinate) -> ManifestId {
        let key = coordinate.key();
        if let Some(handle) = self.registry.get(&key) {
            return handle.id;
        }
        let path = self.repository.pom_path(&coordinate);
        let id = self.insert(coordinate, path);
        self.queue.push_back(Step::Load(id));
        id
    }

    /// Open a project manifest from `path`. Its identity is taken from its
    /// own content; it joins both the registry and the workspace.
    ///
    /// Returns the existing manifest if one with the same identity is
    /// already known.
    pub async fn open(&mut self, path: &Path) -> Result<ManifestId, ResolveError> {
        let path = pomwalk_util::fs::normalize(path);
        let tree = self
            .read_now(&path)
            .await
            .map_err(|e| source_error(&path, project_placeholder(), e))?;
        let document = PomDocument::from_tree(&tree).map_err(|e| ResolveError::Malformed {
            coordinate: project_placeholder(),
            path: path.clone(),
            message: e.to_string(),
        })?;

        let coordinate = project_identity(&document);
        if coordinate.is_degraded() {
            return Err(ResolveError::Unresolved {
                owner: coordinate.clone(),
                coordinate,
                field: "project identity".to_string(),
            });
        }

        let id = match self.registry.get(&coordinate.key()) {
            Some(handle) => handle.id,
            None => {
                let id = self.insert(coordinate.clone(), path);
                self.accept_document(id, document);
                id
            }
        };
        self.workspace.add(ManifestHandle { id, coordinate });
        Ok(id)
    }

    /// Open a project manifest and, recursively, every module it lists.
    pub async fn open_workspace(&mut self, path: &Path) -> Result<ManifestId, ResolveError> {
        let root = self.open(path).await?;
        let mut pending = VecDeque::from([root]);
        let mut visited = HashSet::from([root]);

        while let Some(id) = pending.pop_front() {
            let manifest = &self.manifests[id.0];
            let Some(dir) = manifest.path.parent().map(Path::to_path_buf) else {
                continue;
            };
            let modules = manifest
                .document
                .as_ref()
                .map(|d| d.modules.clone())
                .unwrap_or_default();

            for module in modules {
                let module_path = module_manifest_path(&dir, &module);
                match self.open(&module_path).await {
                    Ok(module_id) => {
                        if visited.insert(module_id) {
                            pending.push_back(module_id);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("skipping module '{module}': {e}");
                        self.errors.push(e);
                    }
                }
            }
        }
        Ok(root)
    }

    /// Drive every pipeline until no step is queued and no read is in flight.
    pub async fn run_until_idle(&mut self) {
        loop {
            while let Some(step) = self.queue.pop_front() {
                self.apply(step);
            }
            match self.reads.join_next().await {
                Some(Ok((id, outcome))) => self.finish_read(id, outcome),
                Some(Err(e)) => tracing::error!("manifest read task failed: {e}"),
                None => break,
            }
        }
    }

    /// Re-run the pipeline of `id` from the start.
    ///
    /// A manifest with a read in flight or a step queued only records the
    /// request; it is applied once that run completes. A manifest that failed
    /// or is parked on its parent or dependencies restarts at once.
    pub fn reload(&mut self, id: ManifestId) {
        let Some(manifest) = self.manifests.get_mut(id.0) else {
            return;
        };
        let parked = matches!(manifest.waiting, Wait::Parent(_) | Wait::Dependencies(_));
        if manifest.changing && manifest.failure.is_none() && !parked {
            manifest.has_changed = true;
            return;
        }
        manifest.begin_run();
        manifest.waiting = Wait::Reading;
        self.queue.push_back(Step::Load(id));
    }

    /// Reload every manifest backed by `path`. Returns how many were reloaded.
    pub fn reload_path(&mut self, path: &Path) -> usize {
        let target = pomwalk_util::fs::normalize(path);
        let ids: Vec<ManifestId> = self
            .manifests
            .iter()
            .filter(|m| m.path == target || pomwalk_util::fs::normalize(&m.path) == target)
            .map(|m| m.id)
            .collect();
        for id in &ids {
            self.reload(*id);
        }
        ids.len()
    }

    /// Run `callback` once `id` completes, or right away if it already has.
    pub fn on_resolved<F>(&mut self, id: ManifestId, callback: F)
    where
        F: FnOnce(&Manifest) + Send + 'static,
    {
        match self.manifests.get(id.0) {
            Some(manifest) if manifest.complete => callback(manifest),
            Some(_) => self.callbacks.entry(id).or_default().push(Box::new(callback)),
            None => tracing::warn!("completion callback registered for unknown manifest {id}"),
        }
    }

    pub fn manifest(&self, id: ManifestId) -> Option<&Manifest> {
        self.manifests.get(id.0)
    }

    pub fn manifests(&self) -> &[Manifest] {
        &self.manifests
    }

    /// The registered manifest for `coordinate`, if any.
    pub fn find(&self, coordinate: &Coordinate) -> Option<&Manifest> {
        self.registry
            .get(&coordinate.key())
            .and_then(|handle| self.manifests.get(handle.id.0))
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Every failure recorded so far, oldest first.
    pub fn errors(&self) -> &[ResolveError] {
        &self.errors
    }

    /// Remove and return every failure recorded so far.
    pub fn take_errors(&mut self) -> Vec<ResolveError> {
        std::mem::take(&mut self.errors)
    }

    /// The classpath of `id` if it is complete.
    pub fn classpath(&self, id: ManifestId) -> Option<&[ClasspathEntry]> {
        self.manifests.get(id.0).and_then(Manifest::classpath)
    }

    /// The dependency graph reachable from `id`.
    pub fn dependency_graph(&self, id: ManifestId) -> DependencyGraph {
        DependencyGraph::from_manifest(&self.manifests, id)
    }

    /// Manifests that are not complete, with the reason each one stopped.
    /// Meaningful once [`Engine::run_until_idle`] has returned.
    pub fn stalled(&self) -> Vec<Stall> {
        self.manifests
            .iter()
            .filter(|m| !m.complete)
            .map(|m| Stall {
                id: m.id,
                coordinate: m.coordinate.clone(),
                reason: self.stall_reason(m),
            })
            .collect()
    }

    fn stall_reason(&self, manifest: &Manifest) -> String {
        if let Some(failure) = &manifest.failure {
            return failure.clone();
        }
        let name = |id: &ManifestId| {
            self.manifests
                .get(id.0)
                .map(|m| m.coordinate.to_string())
                .unwrap_or_else(|| id.to_string())
        };
        match &manifest.waiting {
            Wait::Parent(parent) => format!("waiting on parent {}", name(parent)),
            Wait::Dependencies(pending) => {
                let names: Vec<String> = pending.iter().map(name).collect();
                format!("waiting on dependencies {}", names.join(", "))
            }
            Wait::Reading => "manifest was never read".to_string(),
            Wait::Idle => format!("stopped after {}", manifest.phase),
        }
    }

    pub(crate) fn insert(&mut self, coordinate: Coordinate, path: PathBuf) -> ManifestId {
        let id = ManifestId(self.manifests.len());
        let key = coordinate.key();
        self.manifests.push(Manifest::new(id, coordinate.clone(), path));
        self.registry.put(&key, ManifestHandle { id, coordinate });
        id
    }

    pub(crate) fn spawn_read(&mut self, id: ManifestId) {
        let path = self.manifests[id.0].path.clone();
        let source = Arc::clone(&self.source);
        let sem = self.semaphore.clone();
        self.reads.spawn(async move {
            let _permit = sem.acquire().await;
            (id, load_blocking(source, path).await)
        });
    }

    async fn read_now(&self, path: &Path) -> Result<PomMap, SourceError> {
        let _permit = self.semaphore.acquire().await;
        load_blocking(Arc::clone(&self.source), path.to_path_buf()).await
    }

    fn finish_read(&mut self, id: ManifestId, outcome: Result<PomMap, SourceError>) {
        let manifest = &self.manifests[id.0];
        let coordinate = manifest.coordinate.clone();
        let path = manifest.path.clone();
        let document = outcome
            .map_err(|e| source_error(&path, coordinate.clone(), e))
            .and_then(|tree| {
                PomDocument::from_tree(&tree).map_err(|e| ResolveError::Malformed {
                    coordinate,
                    path,
                    message: e.to_string(),
                })
            });
        match document {
            Ok(document) => self.accept_document(id, document),
            Err(e) => self.fail(id, e),
        }
    }

    /// Install a freshly read document and start the pipeline proper.
    fn accept_document(&mut self, id: ManifestId, document: PomDocument) {
        let manifest = &mut self.manifests[id.0];
        manifest.packaging = document.packaging().to_string();
        manifest.document = Some(document);
        manifest.waiting = Wait::Idle;

        if !manifest.watched {
            manifest.watched = true;
            let path = manifest.path.clone();
            if let Err(e) = self.watcher.watch(&path) {
                tracing::warn!("cannot watch {}: {e}", path.display());
            }
        }
        self.queue.push_back(Step::Parent(id));
    }

    /// Record a failure and leave the manifest where it stopped.
    pub(crate) fn fail(&mut self, id: ManifestId, error: ResolveError) {
        tracing::warn!("{error}");
        let manifest = &mut self.manifests[id.0];
        manifest.failure = Some(error.to_string());
        manifest.waiting = Wait::Idle;
        self.errors.push(error);
    }
}

async fn load_blocking(
    source: Arc<dyn ManifestSource>,
    path: PathBuf,
) -> Result<PomMap, SourceError> {
    let task_path = path.clone();
    match tokio::task::spawn_blocking(move || source.load(&task_path)).await {
        Ok(outcome) => outcome,
        Err(e) => Err(SourceError::Unreadable {
            path,
            source: io::Error::other(e.to_string()),
        }),
    }
}

fn source_error(path: &Path, coordinate: Coordinate, error: SourceError) -> ResolveError {
    match error {
        SourceError::Unreadable { source, .. } => ResolveError::Unreadable {
            coordinate,
            path: path.to_path_buf(),
            message: source.to_string(),
        },
        SourceError::Malformed { message, .. } => ResolveError::Malformed {
            coordinate,
            path: path.to_path_buf(),
            message,
        },
    }
}

/// Stand-in coordinate for a project manifest whose identity is not known yet.
fn project_placeholder() -> Coordinate {
    Coordinate::new("", "", "")
}

/// Identity of a project manifest from its own content: group and version
/// fall back to the declared parent, and `${...}` in any part is expanded
/// from the declared properties.
fn project_identity(document: &PomDocument) -> Coordinate {
    let expand = |value: Option<&str>| {
        interpolate_with(value.unwrap_or_default(), |key| {
            document.property(key).map(str::to_string)
        })
    };
    Coordinate::new(
        expand(document.effective_group_id()),
        expand(document.artifact_id.as_deref()),
        expand(document.effective_version()),
    )
    .with_type(document.packaging())
}

/// `<module>` entries name a directory holding `pom.xml`, or a manifest file.
fn module_manifest_path(dir: &Path, module: &str) -> PathBuf {
    let candidate = dir.join(module);
    if module.ends_with(".xml") {
        candidate
    } else {
        candidate.join("pom.xml")
    }
}
