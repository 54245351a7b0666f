//! A resolution session: one engine opened on a project manifest and driven
//! until idle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pomwalk_core::config::PomwalkConfig;
use pomwalk_core::source::ChangeWatcher;
use pomwalk_maven::repository::LocalRepository;
use pomwalk_maven::source::FileSource;
use pomwalk_resolver::{Engine, EngineOptions, Manifest, ManifestId};
use pomwalk_util::errors::PomwalkError;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "pom.xml";

/// Where to start and which repository to read from.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// The project manifest; the nearest `pom.xml` at or above the current
    /// directory when unset.
    pub manifest_path: Option<PathBuf>,
    /// Overrides the configured local repository.
    pub repository: Option<PathBuf>,
    /// Show a spinner while resolving.
    pub progress: bool,
}

impl SessionOptions {
    /// The manifest path to open, checked for existence.
    pub fn resolve_manifest_path(&self) -> miette::Result<PathBuf> {
        let path = match &self.manifest_path {
            Some(path) => path.clone(),
            None => {
                let cwd = std::env::current_dir().map_err(PomwalkError::Io)?;
                pomwalk_util::fs::find_ancestor_with(&cwd, MANIFEST_FILE)
                    .unwrap_or(cwd)
                    .join(MANIFEST_FILE)
            }
        };
        if !path.is_file() {
            return Err(PomwalkError::Manifest {
                message: format!("no manifest found at {}", path.display()),
            }
            .into());
        }
        Ok(path)
    }
}

pub struct Session {
    engine: Engine,
    root: ManifestId,
    manifest_path: PathBuf,
}

impl Session {
    /// Open the project (and its modules) and resolve everything reachable.
    pub async fn open(opts: &SessionOptions) -> miette::Result<Self> {
        Self::open_with(opts, None).await
    }

    /// Like [`Session::open`], registering every manifest file with `watcher`.
    pub async fn open_with(
        opts: &SessionOptions,
        watcher: Option<Box<dyn ChangeWatcher + Send>>,
    ) -> miette::Result<Self> {
        let manifest_path = opts.resolve_manifest_path()?;
        let config = PomwalkConfig::load()?;
        let repository = match &opts.repository {
            Some(dir) => dir.clone(),
            None => config.local_repository(),
        };
        tracing::debug!("local repository: {}", repository.display());

        let mut engine = Engine::with_options(
            LocalRepository::new(repository),
            Arc::new(FileSource),
            EngineOptions::from_config(&config),
        );
        if let Some(watcher) = watcher {
            engine.set_watcher(watcher);
        }

        let spinner = opts
            .progress
            .then(|| pomwalk_util::progress::spinner("Resolving dependencies..."));
        let opened = engine.open_workspace(&manifest_path).await;
        if opened.is_ok() {
            engine.run_until_idle().await;
        }
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let root = opened?;

        Ok(Self {
            engine,
            root,
            manifest_path,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn root(&self) -> ManifestId {
        self.root
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The root manifest, which must have completed.
    pub fn resolved(&self) -> miette::Result<&Manifest> {
        self.resolved_manifest(self.root)
    }

    /// A manifest that must have completed. Otherwise the error lists every
    /// manifest that never finished and why.
    pub fn resolved_manifest(&self, id: ManifestId) -> miette::Result<&Manifest> {
        let manifest = self.engine.manifest(id).ok_or_else(|| PomwalkError::Generic {
            message: format!("unknown manifest {id}"),
        })?;
        if manifest.is_complete() {
            return Ok(manifest);
        }

        let lines: Vec<String> = self
            .engine
            .stalled()
            .into_iter()
            .map(|stall| stall.into_error().to_string())
            .collect();
        Err(PomwalkError::Resolution {
            message: format!(
                "{} did not resolve\n  {}",
                manifest.coordinate(),
                lines.join("\n  ")
            ),
        }
        .into())
    }

    /// Print the problems recorded since the last report as warning lines.
    pub fn report_errors(&mut self) {
        for error in self.engine.take_errors() {
            pomwalk_util::progress::status_warn("Warning", &error.to_string());
        }
    }

    /// Reload the manifests backed by `paths` and resolve again. Returns the
    /// number of manifests reloaded.
    pub async fn refresh(&mut self, paths: &[PathBuf]) -> usize {
        let reloaded: usize = paths.iter().map(|p| self.engine.reload_path(p)).sum();
        if reloaded > 0 {
            self.engine.run_until_idle().await;
        }
        reloaded
    }
}
