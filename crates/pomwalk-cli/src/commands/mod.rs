//! Command dispatch and handler modules.

mod classpath;
mod properties;
mod tree;
mod watch;

use miette::Result;

use pomwalk_ops::ops_classpath::ClasspathFormat;
use pomwalk_ops::session::SessionOptions;

use crate::cli::{Cli, Command, Format};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let session = SessionOptions {
        manifest_path: cli.manifest_path,
        repository: cli.repo,
        progress: !cli.verbose,
    };
    match cli.command {
        Command::Classpath { format, conflicts } => {
            classpath::exec(&session, format.into(), conflicts).await
        }
        Command::Tree { depth, why } => tree::exec(&session, depth, why).await,
        Command::Properties { env } => properties::exec(&session, env).await,
        Command::Watch { format } => watch::exec(&session, format.into()).await,
    }
}

impl From<Format> for ClasspathFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Lines => ClasspathFormat::Lines,
            Format::Paths => ClasspathFormat::Paths,
            Format::Json => ClasspathFormat::Json,
        }
    }
}
