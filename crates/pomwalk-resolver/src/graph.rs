//! Dependency graph of a resolved manifest, for `tree` and `tree --why`.
//!
//! One node per manifest reached through dependency links. Declared
//! dependencies that never got a manifest (degraded coordinates and edges
//! severed to break a cycle) become leaves of their own so they still show
//! up in the output.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use pomwalk_core::coordinate::{Coordinate, DEFAULT_SCOPE};

use crate::manifest::{Manifest, ManifestId, ResolvedDependency};

/// Root sections, in print order. Anything else sorts last.
const SCOPE_ORDER: [&str; 5] = ["compile", "provided", "runtime", "system", "test"];

/// How a declared dependency connects to the rest of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Followed into the dependency's own manifest.
    Linked,
    /// The coordinate never fully resolved, so nothing was loaded.
    Degraded,
    /// Not followed because it would close a cycle.
    Severed,
}

impl EdgeKind {
    fn of(dependency: &ResolvedDependency) -> Self {
        match dependency.manifest {
            Some(_) => EdgeKind::Linked,
            None if dependency.coordinate.is_degraded() => EdgeKind::Degraded,
            None => EdgeKind::Severed,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            EdgeKind::Linked => "",
            EdgeKind::Degraded => " [unresolved]",
            EdgeKind::Severed => " [cycle]",
        }
    }
}

/// A dependency as its owner resolved it.
#[derive(Debug, Clone)]
pub struct DependencyEdge {
    /// Carries the owner's scope and optionality for this dependency.
    pub coordinate: Coordinate,
    pub kind: EdgeKind,
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        let mut notes = Vec::new();
        if self.coordinate.scope != DEFAULT_SCOPE {
            notes.push(self.coordinate.scope.as_str());
        }
        if self.coordinate.optional {
            notes.push("optional");
        }
        if !notes.is_empty() {
            write!(f, " ({})", notes.join(", "))?;
        }
        f.write_str(self.kind.marker())
    }
}

/// One hop on a path returned by [`DependencyGraph::find_path`].
#[derive(Debug, Clone, Copy)]
pub struct PathStep<'g> {
    pub coordinate: &'g Coordinate,
    /// The edge that led here; `None` for the root.
    pub edge: Option<&'g DependencyEdge>,
}

impl fmt::Display for PathStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if let Some(edge) = self.edge {
            f.write_str(edge.kind.marker())?;
        }
        Ok(())
    }
}

/// Dependency graph rooted at one manifest, backed by petgraph.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Coordinate, DependencyEdge>,
    manifests: HashMap<ManifestId, NodeIndex>,
    root: Option<NodeIndex>,
}

impl DependencyGraph {
    /// Walk the resolved dependency links reachable from `root`.
    ///
    /// Every declared dependency becomes an edge, test-scoped and optional
    /// ones included.
    pub fn from_manifest(manifests: &[Manifest], root: ManifestId) -> Self {
        let mut graph = Self::default();
        let Some(root_manifest) = manifests.get(root.index()) else {
            return graph;
        };
        let root_node = graph.manifest_node(root, root_manifest.coordinate());
        graph.root = Some(root_node);

        let mut queue = VecDeque::from([root]);
        let mut expanded = HashSet::from([root]);
        while let Some(id) = queue.pop_front() {
            let Some(manifest) = manifests.get(id.index()) else {
                continue;
            };
            let Some(&from) = graph.manifests.get(&id) else {
                continue;
            };
            for dependency in manifest.dependencies() {
                let to = match dependency.manifest {
                    Some(next) => {
                        let coordinate = manifests
                            .get(next.index())
                            .map_or(&dependency.coordinate, Manifest::coordinate);
                        if expanded.insert(next) {
                            queue.push_back(next);
                        }
                        graph.manifest_node(next, coordinate)
                    }
                    None => graph.graph.add_node(dependency.coordinate.clone()),
                };
                graph.graph.add_edge(
                    from,
                    to,
                    DependencyEdge {
                        coordinate: dependency.coordinate.clone(),
                        kind: EdgeKind::of(dependency),
                    },
                );
            }
        }
        graph
    }

    fn manifest_node(&mut self, id: ManifestId, coordinate: &Coordinate) -> NodeIndex {
        if let Some(&node) = self.manifests.get(&id) {
            return node;
        }
        let node = self.graph.add_node(coordinate.clone());
        self.manifests.insert(id, node);
        node
    }

    /// The root manifest's coordinate.
    pub fn root(&self) -> Option<&Coordinate> {
        self.root.map(|node| &self.graph[node])
    }

    /// Outgoing edges of `node` in declaration order.
    fn edges_of(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self.graph.edges(node).map(|e| e.id()).collect();
        edges.sort();
        edges
    }

    /// Every dependency that was declared but not followed, with its owner.
    pub fn unfollowed(&self) -> Vec<(&Coordinate, &DependencyEdge)> {
        self.graph
            .edge_indices()
            .filter(|&e| self.graph[e].kind != EdgeKind::Linked)
            .filter_map(|e| {
                let (owner, _) = self.graph.edge_endpoints(e)?;
                Some((&self.graph[owner], &self.graph[e]))
            })
            .collect()
    }

    /// Render the tree, the root's direct dependencies sectioned by scope.
    /// Children deeper than `max_depth` are left out.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let Some(root) = self.root else {
            return String::new();
        };
        let mut printer = TreePrinter {
            graph: self,
            max_depth,
            on_path: HashSet::from([root]),
            output: format!("{}\n", self.graph[root]),
        };

        let mut direct = self.edges_of(root);
        direct.sort_by_key(|&e| {
            let scope = &self.graph[e].coordinate.scope;
            (scope_rank(scope), scope.clone())
        });
        let sections: Vec<&str> = direct
            .iter()
            .map(|&e| self.graph[e].coordinate.scope.as_str())
            .fold(Vec::new(), |mut seen, scope| {
                if seen.last() != Some(&scope) {
                    seen.push(scope);
                }
                seen
            });
        let headers = sections.len() > 1;

        let mut current = None;
        for (i, &edge) in direct.iter().enumerate() {
            let scope = self.graph[edge].coordinate.scope.as_str();
            if headers && current != Some(scope) {
                printer.output.push_str(&format!("[{scope}]\n"));
                current = Some(scope);
            }
            printer.branch(edge, "", i + 1 == direct.len(), 1);
        }
        printer.output
    }

    /// Shortest path from the root to the first dependency matching
    /// `target`: a full `group:artifact:version`, a `group:artifact`, or a
    /// bare artifact id.
    pub fn find_path(&self, target: &str) -> Option<Vec<PathStep<'_>>> {
        let root = self.root?;
        let mut reached_by: HashMap<NodeIndex, EdgeIndex> = HashMap::new();
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);

        while let Some(node) = queue.pop_front() {
            if node != root && matches_target(&self.graph[node], target) {
                return Some(self.path_to(node, &reached_by));
            }
            for edge in self.edges_of(node) {
                let Some((_, next)) = self.graph.edge_endpoints(edge) else {
                    continue;
                };
                if visited.insert(next) {
                    reached_by.insert(next, edge);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn path_to(
        &self,
        target: NodeIndex,
        reached_by: &HashMap<NodeIndex, EdgeIndex>,
    ) -> Vec<PathStep<'_>> {
        let mut steps = Vec::new();
        let mut node = target;
        while let Some(&edge) = reached_by.get(&node) {
            steps.push(PathStep {
                coordinate: &self.graph[node],
                edge: Some(&self.graph[edge]),
            });
            match self.graph.edge_endpoints(edge) {
                Some((from, _)) => node = from,
                None => break,
            }
        }
        steps.push(PathStep {
            coordinate: &self.graph[node],
            edge: None,
        });
        steps.reverse();
        steps
    }

    /// Number of dependency nodes, the root excluded.
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(usize::from(self.root.is_some()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct TreePrinter<'g> {
    graph: &'g DependencyGraph,
    max_depth: Option<usize>,
    on_path: HashSet<NodeIndex>,
    output: String,
}

impl TreePrinter<'_> {
    fn branch(&mut self, edge: EdgeIndex, prefix: &str, last: bool, depth: usize) {
        let graph = self.graph;
        let connector = if last { "\\- " } else { "+- " };
        self.output
            .push_str(&format!("{prefix}{connector}{}\n", graph.graph[edge]));

        let Some((_, node)) = graph.graph.edge_endpoints(edge) else {
            return;
        };
        if self.max_depth.is_some_and(|max| depth >= max) || !self.on_path.insert(node) {
            return;
        }
        let child_prefix = format!("{prefix}{}", if last { "   " } else { "|  " });
        let children = graph.edges_of(node);
        for (i, &child) in children.iter().enumerate() {
            self.branch(child, &child_prefix, i + 1 == children.len(), depth + 1);
        }
        self.on_path.remove(&node);
    }
}

fn scope_rank(scope: &str) -> usize {
    SCOPE_ORDER
        .iter()
        .position(|s| *s == scope)
        .unwrap_or(SCOPE_ORDER.len())
}

fn matches_target(coordinate: &Coordinate, target: &str) -> bool {
    coordinate.key() == target
        || coordinate.artifact_key() == target
        || coordinate.artifact_id == target
}
