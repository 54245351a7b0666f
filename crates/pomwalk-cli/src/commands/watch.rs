//! Watch command: re-resolve on manifest changes.
//!
//! Every manifest the engine reads, including parents and dependencies in
//! the local repository, is registered with a `notify` watcher. The watch is
//! placed on the containing directory so editors that save by renaming a
//! temporary file over the manifest keep being seen. Events are debounced so
//! rapid saves trigger a single cycle, and only the manifests backed by the
//! changed files are reloaded.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use miette::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use pomwalk_core::config::PomwalkConfig;
use pomwalk_core::source::ChangeWatcher;
use pomwalk_ops::ops_classpath::{self, ClasspathFormat, ClasspathOptions};
use pomwalk_ops::session::{Session, SessionOptions};
use pomwalk_util::errors::PomwalkError;

/// Forwards change events for registered manifest files over a channel.
struct NotifyWatcher {
    watcher: RecommendedWatcher,
    /// Manifest files to report, shared with the event callback.
    files: Arc<Mutex<HashSet<PathBuf>>>,
    dirs: HashSet<PathBuf>,
}

impl NotifyWatcher {
    fn new(tx: mpsc::UnboundedSender<PathBuf>) -> Result<Self> {
        let files: Arc<Mutex<HashSet<PathBuf>>> = Arc::default();
        let registered = Arc::clone(&files);
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) if is_relevant_event(&event) => {
                    let registered = registered.lock().unwrap_or_else(|e| e.into_inner());
                    for path in event.paths {
                        if registered.contains(&path) {
                            let _ = tx.send(path);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("file watcher error: {e}"),
            }
        })
        .map_err(|e| PomwalkError::Watch {
            message: format!("Failed to create file watcher: {e}"),
        })?;
        Ok(Self {
            watcher,
            files,
            dirs: HashSet::new(),
        })
    }
}

impl ChangeWatcher for NotifyWatcher {
    fn watch(&mut self, path: &Path) -> std::result::Result<(), PomwalkError> {
        // Event paths are reported under the canonical directory.
        let path = pomwalk_util::fs::normalize(path);
        let dir = watched_dir(&path);
        if !self.dirs.contains(&dir) {
            self.watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|e| PomwalkError::Watch {
                    message: format!("Failed to watch {}: {e}", dir.display()),
                })?;
            self.dirs.insert(dir);
        }
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path);
        Ok(())
    }
}

/// Directory holding `path`; a bare file name lives in the current directory.
fn watched_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub async fn exec(session_opts: &SessionOptions, format: ClasspathFormat) -> Result<()> {
    let config = PomwalkConfig::load()?;
    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let opts = ClasspathOptions {
        format,
        conflicts: false,
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let watcher = NotifyWatcher::new(tx)?;
    let mut session = Session::open_with(session_opts, Some(Box::new(watcher))).await?;

    pomwalk_util::progress::status(
        "Watching",
        &format!("{} for changes", session.manifest_path().display()),
    );
    print_cycle(&mut session, &opts);

    loop {
        let first = tokio::select! {
            changed = rx.recv() => match changed {
                Some(path) => path,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        // Debounce: drain additional events within the window
        tokio::time::sleep(debounce).await;
        let mut changed = BTreeSet::from([first]);
        while let Ok(path) = rx.try_recv() {
            changed.insert(path);
        }

        let changed: Vec<PathBuf> = changed.into_iter().collect();
        if session.refresh(&changed).await == 0 {
            tracing::debug!("no manifest backed by {changed:?}");
            continue;
        }

        eprint!("\x1B[2J\x1B[H");
        pomwalk_util::progress::status("Detected", "change, resolving...");
        print_cycle(&mut session, &opts);
    }

    Ok(())
}

fn print_cycle(session: &mut Session, opts: &ClasspathOptions) {
    session.report_errors();
    let rendered = session
        .resolved()
        .and_then(|manifest| ops_classpath::render(manifest, opts));
    match rendered {
        Ok(output) => print!("{output}"),
        Err(e) => pomwalk_util::progress::status_warn("Error", &e.to_string()),
    }
    pomwalk_util::progress::status("Watching", "for changes...");
}

/// Only content changes to manifest files matter.
fn is_relevant_event(event: &notify::Event) -> bool {
    use notify::EventKind;

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }

    event.paths.iter().any(|p| {
        let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
        !name.starts_with('.') && matches!(ext, "xml" | "pom")
    })
}
