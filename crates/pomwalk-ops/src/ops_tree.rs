//! Operation: display the dependency tree.

use pomwalk_resolver::graph::DependencyGraph;

use crate::session::{Session, SessionOptions};

/// Options for `pomwalk tree`.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show how the project reaches a specific dependency.
    pub why: Option<String>,
}

/// Display the dependency tree for the project.
pub async fn tree(session: &SessionOptions, opts: &TreeOptions) -> miette::Result<()> {
    let mut session = Session::open(session).await?;
    session.report_errors();
    let root = session.resolved()?.id();
    let graph = session.engine().dependency_graph(root);
    print!("{}", render(&graph, opts));
    Ok(())
}

/// Render the tree, or the path to `opts.why` when set.
pub fn render(graph: &DependencyGraph, opts: &TreeOptions) -> String {
    if let Some(ref target) = opts.why {
        return match graph.find_path(target) {
            Some(path) => {
                let mut output = format!("Path to {target}:\n");
                for (i, node) in path.iter().enumerate() {
                    let indent = "  ".repeat(i);
                    output.push_str(&format!("{indent}{node}\n"));
                }
                output
            }
            None => format!("Dependency '{target}' not found in the graph.\n"),
        };
    }

    let mut output = graph.print_tree(opts.depth);
    if graph.is_empty() {
        output.push_str("No dependencies.\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pomwalk_core::coordinate::Coordinate;
    use pomwalk_maven::repository::LocalRepository;
    use pomwalk_maven::source::MemorySource;
    use pomwalk_resolver::{Engine, EngineOptions};

    /// Resolve `org:app:1` from manifests given as `(artifact, dependencies)`
    /// with comma-separated dependencies, all in group `org` at version `1`.
    async fn graph(manifests: &[(&str, &str)]) -> DependencyGraph {
        let repo = LocalRepository::new("/repo");
        let source = MemorySource::new();
        for (artifact, deps) in manifests {
            let coordinate = Coordinate::new("org", *artifact, "1");
            let deps: String = deps
                .split(',')
                .filter(|d| !d.is_empty())
                .map(|d| {
                    format!(
                        "<dependency><groupId>org</groupId><artifactId>{d}</artifactId>\
                         <version>1</version></dependency>"
                    )
                })
                .collect();
            source.insert(
                repo.pom_path(&coordinate),
                format!(
                    "<project><groupId>org</groupId><artifactId>{artifact}</artifactId>\
                     <version>1</version><dependencies>{deps}</dependencies></project>"
                ),
            );
        }

        let mut engine = Engine::with_options(repo, Arc::new(source), EngineOptions::isolated());
        let app = engine.obtain(Coordinate::new("org", "app", "1"));
        engine.run_until_idle().await;
        engine.dependency_graph(app)
    }

    async fn chain() -> DependencyGraph {
        graph(&[("app", "lib"), ("lib", "util"), ("util", "")]).await
    }

    #[tokio::test]
    async fn why_prints_indented_path() {
        let opts = TreeOptions {
            why: Some("util".to_string()),
            ..TreeOptions::default()
        };
        assert_eq!(
            render(&chain().await, &opts),
            "Path to util:\norg:app:1\n  org:lib:1\n    org:util:1\n"
        );
    }

    #[tokio::test]
    async fn why_marks_a_severed_cycle() {
        let graph = graph(&[("app", "lib"), ("lib", "app")]).await;
        let opts = TreeOptions {
            why: Some("org:app:1".to_string()),
            ..TreeOptions::default()
        };
        assert_eq!(
            render(&graph, &opts),
            "Path to org:app:1:\norg:app:1\n  org:lib:1\n    org:app:1 [cycle]\n"
        );
    }

    #[tokio::test]
    async fn why_unknown_dependency() {
        let opts = TreeOptions {
            why: Some("nope".to_string()),
            ..TreeOptions::default()
        };
        assert_eq!(
            render(&chain().await, &opts),
            "Dependency 'nope' not found in the graph.\n"
        );
    }

    #[tokio::test]
    async fn depth_limits_tree() {
        let opts = TreeOptions {
            depth: Some(1),
            ..TreeOptions::default()
        };
        assert_eq!(render(&chain().await, &opts), "org:app:1\n\\- org:lib:1\n");
    }

    #[tokio::test]
    async fn leaf_project_says_so() {
        let graph = graph(&[("app", "")]).await;
        assert_eq!(
            render(&graph, &TreeOptions::default()),
            "org:app:1\nNo dependencies.\n"
        );
    }
}
