//! Dependency graph over instance names.
//!
//! This module provides the graph data structure and algorithms needed to
//! order construction: dangling-reference detection, cycle detection with a
//! full cycle path, and topological ordering so every instance is built
//! after the instances it references.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::core::error::similar_names;
use crate::core::{Result, SpinnerError};
use crate::resolver::scanner::ScannedRecipe;
use crate::spec::SpecStore;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Directed graph where an edge `a → b` means "`a` needs `b` built first".
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<String, ()>,
    /// Map from instance names to their graph indices.
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of scanned recipes.
    ///
    /// Every recipe gets a node, even without dependencies. Fails with
    /// [`SpinnerError::MissingDependency`] on the first reference to a name
    /// that is not in `store`.
    pub fn from_scanned(scanned: &[ScannedRecipe<'_>], store: &SpecStore) -> Result<Self> {
        let mut graph = Self::new();

        for recipe in scanned {
            graph.ensure_node(recipe.name());
        }

        for recipe in scanned {
            for dependency in recipe.dependencies() {
                if !store.contains(dependency) {
                    return Err(SpinnerError::MissingDependency {
                        name: dependency.to_string(),
                        required_by: recipe.name().to_string(),
                        suggestions: similar_names(dependency, store.names()),
                    });
                }
                graph.add_dependency(recipe.name(), dependency);
            }
        }

        Ok(graph)
    }

    /// Add a node to the graph if it doesn't already exist.
    ///
    /// Returns the node index in the graph.
    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(name) {
            index
        } else {
            let index = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), index);
            index
        }
    }

    /// Add a dependency relationship to the graph.
    ///
    /// `from` depends on `to`, meaning `to` must be built before `from`.
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        // A recipe referencing the same instance twice still gets one edge
        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Detect cycles in the dependency graph using DFS with colors.
    ///
    /// Returns [`SpinnerError::CircularDependency`] with the cycle path, its
    /// first name repeated at the end, if a cycle is detected.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut colors: HashMap<NodeIndex, Color> =
            self.graph.node_indices().map(|node| (node, Color::White)).collect();

        for node in self.graph.node_indices() {
            if colors.get(&node) != Some(&Color::White) {
                continue;
            }
            if let Some(cycle) = self.dfs_visit(node, &mut colors) {
                return Err(SpinnerError::CircularDependency {
                    cycle: cycle.into_iter().map(|idx| self.graph[idx].clone()).collect(),
                });
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection, starting at `root`.
    ///
    /// Iterative; the explicit stack is the current path. Returns
    /// `Some(cycle_path)` if a cycle is detected, None otherwise.
    fn dfs_visit(&self, root: NodeIndex, colors: &mut HashMap<NodeIndex, Color>) -> Option<Vec<NodeIndex>> {
        let mut stack = vec![(root, self.graph.neighbors(root))];
        colors.insert(root, Color::Gray);

        while let Some((node, neighbors)) = stack.last_mut() {
            let node = *node;
            match neighbors.next() {
                Some(neighbor) => match colors.get(&neighbor) {
                    Some(Color::Gray) => {
                        // Gray nodes are on the current path
                        let start = stack.iter().position(|(n, _)| *n == neighbor).unwrap_or(0);
                        let mut cycle: Vec<NodeIndex> = stack[start..].iter().map(|(n, _)| *n).collect();
                        cycle.push(neighbor);
                        return Some(cycle);
                    }
                    Some(Color::White) => {
                        colors.insert(neighbor, Color::Gray);
                        stack.push((neighbor, self.graph.neighbors(neighbor)));
                    }
                    _ => {}
                },
                None => {
                    colors.insert(node, Color::Black);
                    stack.pop();
                }
            }
        }

        None
    }

    /// Get the topological order for construction.
    ///
    /// Returns names in an order where all dependencies come before their
    /// dependents.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        // First check for cycles, so the error carries the full path
        self.detect_cycles()?;

        match toposort(&self.graph, None) {
            // Edges point from dependent to dependency, so reverse
            Ok(indices) => Ok(indices.into_iter().rev().map(|idx| self.graph[idx].clone()).collect()),
            Err(cycle) => Err(SpinnerError::CircularDependency {
                cycle: vec![self.graph[cycle.node_id()].clone(); 2],
            }),
        }
    }

    /// Get all transitive dependencies for a given instance.
    ///
    /// Returns every name the instance depends on, directly or indirectly.
    pub fn transitive_deps(&self, name: &str) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();
        let mut queue = VecDeque::new();

        if let Some(&node_idx) = self.node_map.get(name) {
            queue.push_back(node_idx);

            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors(current) {
                    if deps.insert(self.graph[neighbor].clone()) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        deps
    }

    /// Get direct dependencies for a given instance, sorted by name.
    pub fn direct_deps(&self, name: &str) -> Vec<String> {
        let mut deps: Vec<String> = match self.node_map.get(name) {
            Some(&node_idx) => {
                self.graph.neighbors(node_idx).map(|idx| self.graph[idx].clone()).collect()
            }
            None => Vec::new(),
        };
        deps.sort();
        deps
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges (dependencies) in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a human-readable dependency tree rooted at `root`.
    ///
    /// Shared dependencies are expanded the first time they appear and
    /// marked `(already shown)` after that.
    pub fn to_tree_string(&self, root: &str) -> String {
        let mut result = format!("{root}\n");
        let mut visited = HashSet::new();
        visited.insert(root.to_string());

        // (name, prefix, is_last), popped in display order
        let mut pending: Vec<(String, String, bool)> = Self::tree_children(self.direct_deps(root), "");

        while let Some((name, prefix, is_last)) = pending.pop() {
            let connector = if is_last {
                "└── "
            } else {
                "├── "
            };
            result.push_str(&format!("{prefix}{connector}{name}\n"));

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };

            if !visited.insert(name.clone()) {
                result.push_str(&format!("{child_prefix}└── (already shown)\n"));
                continue;
            }

            pending.extend(Self::tree_children(self.direct_deps(&name), &child_prefix));
        }

        result
    }

    /// Stack entries for `deps`, reversed so the first one is popped first.
    fn tree_children(deps: Vec<String>, prefix: &str) -> Vec<(String, String, bool)> {
        let last = deps.len().saturating_sub(1);
        deps.into_iter()
            .enumerate()
            .rev()
            .map(|(i, dep)| (dep, prefix.to_string(), i == last))
            .collect()
    }
}
