//! Operation: list the effective property table of the project.

use pomwalk_core::properties::PropertyTable;

use crate::session::{Session, SessionOptions};

const ENV_PREFIX: &str = "env.";

/// Options for `pomwalk properties`.
#[derive(Debug, Clone, Default)]
pub struct PropertiesOptions {
    /// Include `env.*` entries.
    pub env: bool,
}

/// Resolve the project and print its property table in lookup order.
pub async fn properties(session: &SessionOptions, opts: &PropertiesOptions) -> miette::Result<()> {
    let mut session = Session::open(session).await?;
    session.report_errors();
    let manifest = session.resolved()?;
    print!("{}", render(manifest.properties(), opts));
    Ok(())
}

/// One `key = value` line per entry.
pub fn render(table: &PropertyTable, opts: &PropertiesOptions) -> String {
    table
        .iter()
        .filter(|p| opts.env || !p.key.starts_with(ENV_PREFIX))
        .map(|p| format!("{} = {}\n", p.key, p.value))
        .collect()
}
