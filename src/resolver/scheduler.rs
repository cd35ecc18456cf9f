//! Build scheduling.
//!
//! [`schedule`] runs everything that must succeed before the first
//! constructor is called: scanning every recipe, building the dependency
//! graph (dangling references) and ordering it (cycles). A [`BuildPlan`]
//! therefore always describes a build that can run to completion as far as
//! the graph is concerned.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::Result;
use crate::resolver::dependency_graph::DependencyGraph;
use crate::resolver::scanner::{ScannedRecipe, scan};
use crate::spec::SpecStore;

/// Scanned recipes in construction order, plus the graph they came from.
#[derive(Debug, Clone)]
pub struct BuildPlan<'s> {
    steps: Vec<ScannedRecipe<'s>>,
    graph: DependencyGraph,
}

impl<'s> BuildPlan<'s> {
    /// Steps in the order they must be constructed.
    pub fn steps(&self) -> &[ScannedRecipe<'s>] {
        &self.steps
    }

    /// Instance names in construction order.
    pub fn order(&self) -> Vec<&'s str> {
        self.steps.iter().map(ScannedRecipe::name).collect()
    }

    /// The dependency graph the order was derived from.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Number of instances the plan builds.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan builds nothing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn into_steps(self) -> Vec<ScannedRecipe<'s>> {
        self.steps
    }
}

/// Scan, graph and order every recipe in `store`.
pub fn schedule(store: &SpecStore) -> Result<BuildPlan<'_>> {
    let scanned: Vec<ScannedRecipe<'_>> = store.recipes().map(|recipe| scan(recipe, store)).collect();

    let graph = DependencyGraph::from_scanned(&scanned, store)?;
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "Dependency graph built");

    let order = graph.topological_order()?;

    let mut by_name: BTreeMap<&str, ScannedRecipe<'_>> =
        scanned.into_iter().map(|recipe| (recipe.name(), recipe)).collect();
    // Every graph node comes from a scanned recipe, dangling names were rejected above
    let steps: Vec<ScannedRecipe<'_>> =
        order.iter().filter_map(|name| by_name.remove(name.as_str())).collect();

    debug!("Build order: {}", steps.iter().map(ScannedRecipe::name).collect::<Vec<_>>().join(", "));

    Ok(BuildPlan {
        steps,
        graph,
    })
}
