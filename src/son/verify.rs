// src/son/verify.rs
//! Structural checks over the live node graph.
//!
//! The graph is materialized into a petgraph `UnGraph` so reachability can
//! be walked over both edge directions, the way the visualizer consumes
//! it. Used by tests and available for debugging; `verify` returns every
//! violation found rather than stopping at the first.
use crate::son::graph::SonGraph;
use crate::son::node::{NodeId, NodeKind};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;
use std::collections::HashMap;

pub struct GraphVerifier<'a> {
    graph: &'a SonGraph,
}

impl<'a> GraphVerifier<'a> {
    #[must_use]
    pub const fn new(graph: &'a SonGraph) -> Self {
        Self { graph }
    }

    /// Runs every structural check. `roots` are the nodes reachability is
    /// seeded from, normally Start and Stop.
    pub fn verify(&self, roots: &[NodeId]) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        self.check_edge_mirroring(&mut violations);
        self.check_cfg_inputs(&mut violations);
        self.check_liveness(roots, &mut violations);
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Every input edge must be mirrored by an output entry with matching
    /// multiplicity, and vice versa.
    fn check_edge_mirroring(&self, violations: &mut Vec<String>) {
        for node in self.graph.live_nodes() {
            for &def in node.inputs().iter().flatten() {
                let uses_of_def = self
                    .graph
                    .node(def)
                    .outputs()
                    .iter()
                    .filter(|&&user| user == Some(node.id()))
                    .count();
                let refs_to_def = node
                    .inputs()
                    .iter()
                    .filter(|&&input| input == Some(def))
                    .count();
                if uses_of_def != refs_to_def {
                    violations.push(format!(
                        "edge mirror broken between {} and {}: {refs_to_def} input refs vs {uses_of_def} uses",
                        node.unique_name(),
                        self.graph.node(def).unique_name(),
                    ));
                }
            }
            for &user in node.outputs().iter().flatten() {
                if !self
                    .graph
                    .node(user)
                    .inputs()
                    .iter()
                    .any(|&input| input == Some(node.id()))
                {
                    violations.push(format!(
                        "{} lists {} as a user, but is not among its inputs",
                        node.unique_name(),
                        self.graph.node(user).unique_name(),
                    ));
                }
            }
        }
    }

    /// Input 0 of a control node must be null or itself a control node.
    fn check_cfg_inputs(&self, violations: &mut Vec<String>) {
        for node in self.graph.live_nodes() {
            if !self.graph.is_cfg(node.id()) || matches!(node.kind(), NodeKind::Start(_)) {
                continue;
            }
            if let Some(ctrl) = node.input(0) {
                if !self.graph.is_cfg(ctrl) {
                    violations.push(format!(
                        "control node {} has non-control input 0 {}",
                        node.unique_name(),
                        self.graph.node(ctrl).unique_name(),
                    ));
                }
            }
        }
    }

    /// After peepholing, every node reachable from the roots must still be
    /// in use (or be a root itself): dead code must not stay attached.
    fn check_liveness(&self, roots: &[NodeId], violations: &mut Vec<String>) {
        let (un_graph, indices) = self.build_petgraph();
        let mut seen = vec![false; self.graph.num_nodes()];
        for &root in roots {
            let Some(&root_index) = indices.get(&root) else { continue };
            let mut dfs = Dfs::new(&un_graph, root_index);
            while let Some(nx) = dfs.next(&un_graph) {
                let id = un_graph[nx];
                seen[id.index()] = true;
            }
        }
        for node in self.graph.live_nodes() {
            if !seen[node.id().index()] {
                continue;
            }
            if roots.contains(&node.id()) || matches!(node.kind(), NodeKind::Scope { .. }) {
                continue;
            }
            if node.is_unused() {
                violations.push(format!("reachable node {} has no uses", node.unique_name()));
            }
        }
    }

    /// Live nodes and def/use edges as an undirected petgraph, for walking
    /// both edge directions at once.
    fn build_petgraph(&self) -> (UnGraph<NodeId, ()>, HashMap<NodeId, NodeIndex>) {
        let mut un_graph = UnGraph::new_undirected();
        let mut indices = HashMap::new();
        for node in self.graph.live_nodes() {
            let index = un_graph.add_node(node.id());
            indices.insert(node.id(), index);
        }
        for node in self.graph.live_nodes() {
            let user = indices[&node.id()];
            for &def in node.inputs().iter().flatten() {
                if let Some(&def_index) = indices.get(&def) {
                    un_graph.add_edge(def_index, user, ());
                }
            }
        }
        (un_graph, indices)
    }
}
