//! Operation: print the resolved classpath of the project.

use std::path::PathBuf;

use serde::Serialize;

use pomwalk_resolver::conflict::VersionConflict;
use pomwalk_resolver::manifest::ClasspathEntry;
use pomwalk_resolver::Manifest;
use pomwalk_util::errors::PomwalkError;

use crate::session::{Session, SessionOptions};

/// How `pomwalk classpath` prints entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClasspathFormat {
    /// One `group:artifact:version` per line.
    #[default]
    Lines,
    /// Artifact files joined with the platform path separator.
    Paths,
    /// Entries and conflicts as JSON.
    Json,
}

/// Options for `pomwalk classpath`.
#[derive(Debug, Clone, Default)]
pub struct ClasspathOptions {
    pub format: ClasspathFormat,
    /// Also list versions dropped by de-duplication.
    pub conflicts: bool,
}

#[derive(Serialize)]
struct ClasspathReport<'a> {
    project: String,
    classpath: &'a [ClasspathEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicts: Option<&'a [VersionConflict]>,
}

/// Resolve the project and print its classpath.
pub async fn classpath(session: &SessionOptions, opts: &ClasspathOptions) -> miette::Result<()> {
    let mut session = Session::open(session).await?;
    session.report_errors();
    let output = render(session.resolved()?, opts)?;
    print!("{output}");
    Ok(())
}

/// Render the classpath of a completed manifest.
pub fn render(manifest: &Manifest, opts: &ClasspathOptions) -> miette::Result<String> {
    let entries = manifest.classpath().ok_or_else(|| PomwalkError::Resolution {
        message: format!("{} has no classpath yet", manifest.coordinate()),
    })?;
    let conflicts = &manifest.conflicts().conflicts;

    let mut output = match opts.format {
        ClasspathFormat::Lines => entries
            .iter()
            .map(|e| format!("{}\n", e.coordinate))
            .collect::<String>(),
        ClasspathFormat::Paths => {
            let files: Vec<PathBuf> = entries.iter().map(|e| e.file.clone()).collect();
            let joined = to_classpath_string(&files);
            if joined.is_empty() {
                joined
            } else {
                format!("{joined}\n")
            }
        }
        ClasspathFormat::Json => {
            let report = ClasspathReport {
                project: manifest.coordinate().to_string(),
                classpath: entries,
                conflicts: opts.conflicts.then_some(conflicts.as_slice()),
            };
            let json = serde_json::to_string_pretty(&report).map_err(|e| PomwalkError::Generic {
                message: format!("failed to serialize classpath: {e}"),
            })?;
            return Ok(format!("{json}\n"));
        }
    };

    if opts.conflicts {
        if conflicts.is_empty() {
            output.push_str("No version conflicts.\n");
        } else {
            output.push_str(&manifest.conflicts().to_string());
        }
    }
    Ok(output)
}

/// Join artifact files into a single classpath argument.
pub fn to_classpath_string(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(classpath_separator())
}

fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
