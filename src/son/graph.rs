// src/son/graph.rs
//! The node arena and its mirrored-edge discipline.
//!
//! Nodes live in a flat arena and reference each other through stable
//! [`NodeId`] indices, so rewiring is O(1) and cycles cost nothing. Every
//! input edge is mirrored by an output entry on the definition; all
//! mutation goes through the helpers here, which keep the two sides in sync
//! before any recursive kill fires. A killed node keeps its arena slot as a
//! tombstone (empty inputs/outputs, no type) until the arena is dropped.
use crate::son::node::{Node, NodeId, NodeKind};
use crate::son::types::Type;

#[derive(Debug)]
pub struct SonGraph {
    nodes: Vec<Node>,
    start: NodeId,
    peephole_disabled: bool,
}

impl SonGraph {
    /// Creates a graph holding only the Start node, whose tuple type is
    /// `(Ctrl, arg)`.
    #[must_use]
    pub fn new(arg: Type) -> Self {
        let mut graph = Self { nodes: Vec::new(), start: NodeId::from_index(0), peephole_disabled: false };
        let args = Type::Tuple(vec![Type::Ctrl, arg]);
        let start = graph.alloc(NodeKind::Start(args.clone()), Vec::new());
        graph.nodes[start.index()].ty = Some(args);
        graph.start = start;
        graph
    }

    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    /// Observation mode: `peephole` still computes types but performs no
    /// rewrites, so the full constructed graph can be inspected.
    pub fn set_peephole_disabled(&mut self, disabled: bool) {
        self.peephole_disabled = disabled;
    }

    #[must_use]
    pub const fn peephole_disabled(&self) -> bool {
        self.peephole_disabled
    }

    /// Number of arena slots, live or dead. Ids run from 1 to this value.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[must_use]
    pub fn ty(&self, id: NodeId) -> Option<&Type> {
        self.node(id).ty.as_ref()
    }

    #[must_use]
    pub fn input(&self, n: NodeId, i: usize) -> Option<NodeId> {
        self.node(n).input(i)
    }

    #[must_use]
    pub fn num_inputs(&self, n: NodeId) -> usize {
        self.node(n).num_inputs()
    }

    #[must_use]
    pub fn is_unused(&self, n: NodeId) -> bool {
        self.node(n).is_unused()
    }

    #[must_use]
    pub fn is_dead(&self, n: NodeId) -> bool {
        self.node(n).is_dead()
    }

    /// Iterates every node that has not been killed.
    pub fn live_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_dead())
    }

    /// True for nodes that sit on the control-flow path: Start, Return,
    /// Stop, If, Region, and projections of an If (or slot 0 of any
    /// multi-node).
    #[must_use]
    pub fn is_cfg(&self, n: NodeId) -> bool {
        match self.kind(n) {
            NodeKind::Start(_)
            | NodeKind::Return
            | NodeKind::Stop
            | NodeKind::If
            | NodeKind::Region => true,
            NodeKind::Proj { index, .. } => {
                *index == 0
                    || self
                        .input(n, 0)
                        .is_some_and(|parent| matches!(self.kind(parent), NodeKind::If))
            }
            _ => false,
        }
    }

    /// Creates a node and registers a use on each non-null input.
    pub(crate) fn alloc(&mut self, kind: NodeKind, inputs: Vec<Option<NodeId>>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let defs: Vec<NodeId> = inputs.iter().copied().flatten().collect();
        self.nodes.push(Node { id, kind, inputs, outputs: Vec::new(), ty: None });
        for def in defs {
            self.add_use(def, id);
        }
        id
    }

    // ----- edge discipline -------------------------------------------------

    /// Rewires input `i` of `n`. The new definition gains its use before the
    /// old one loses its own, so a recursive kill of the old definition can
    /// never free the incoming node.
    pub fn set_def(&mut self, n: NodeId, i: usize, new_def: Option<NodeId>) {
        let old_def = self.input(n, i);
        if old_def == new_def {
            return;
        }
        if let Some(def) = new_def {
            self.add_use(def, n);
        }
        self.node_mut(n).inputs[i] = new_def;
        if let Some(def) = old_def {
            if self.del_use(def, Some(n)) {
                self.kill(def);
            }
        }
    }

    /// Appends a definition to `n`'s inputs.
    pub fn add_def(&mut self, n: NodeId, def: Option<NodeId>) {
        self.node_mut(n).inputs.push(def);
        if let Some(def) = def {
            self.add_use(def, n);
        }
    }

    fn add_use(&mut self, def: NodeId, user: NodeId) {
        self.node_mut(def).outputs.push(Some(user));
    }

    /// Removes one matching use in O(1) via swap-with-last. Returns true
    /// when the definition has no remaining uses, which is the signal to
    /// kill it.
    fn del_use(&mut self, def: NodeId, user: Option<NodeId>) -> bool {
        let outputs = &mut self.node_mut(def).outputs;
        if let Some(pos) = outputs.iter().position(|&u| u == user) {
            outputs.swap_remove(pos);
        }
        outputs.is_empty()
    }

    /// Drops the last `count` inputs of `n`, recursively killing any
    /// definition that loses its final use. This is the only place input
    /// arity shrinks.
    pub fn pop_defs(&mut self, n: NodeId, count: usize) {
        for _ in 0..count {
            let old_def = self.node_mut(n).inputs.pop().flatten();
            if let Some(def) = old_def {
                if self.del_use(def, Some(n)) {
                    self.kill(def);
                }
            }
        }
    }

    /// Tombstones an unused node: unhooks every input (possibly killing
    /// them), empties the input list and clears the type.
    pub fn kill(&mut self, n: NodeId) {
        debug_assert!(self.is_unused(n), "kill of a node that still has uses");
        let count = self.num_inputs(n);
        self.pop_defs(n, count);
        self.node_mut(n).ty = None;
        debug_assert!(self.is_dead(n));
    }

    /// Adds a sentinel use so the node survives DCE during a transient
    /// rewrite window.
    pub fn keep(&mut self, n: NodeId) {
        self.node_mut(n).outputs.push(None);
    }

    /// Removes one keep-alive sentinel.
    pub fn unkeep(&mut self, n: NodeId) {
        self.del_use(n, None);
    }

    // ----- construction helpers -------------------------------------------

    pub fn new_constant(&mut self, ty: Type) -> NodeId {
        let start = self.start;
        self.alloc(NodeKind::Constant(ty), vec![Some(start)])
    }

    pub fn new_binary(&mut self, kind: NodeKind, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(kind, vec![None, Some(lhs), Some(rhs)])
    }

    pub fn new_unary(&mut self, kind: NodeKind, expr: NodeId) -> NodeId {
        self.alloc(kind, vec![None, Some(expr)])
    }

    pub fn new_return(&mut self, ctrl: Option<NodeId>, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::Return, vec![ctrl, Some(expr)])
    }

    pub fn new_stop(&mut self) -> NodeId {
        self.alloc(NodeKind::Stop, Vec::new())
    }

    pub fn new_if(&mut self, ctrl: Option<NodeId>, pred: NodeId) -> NodeId {
        self.alloc(NodeKind::If, vec![ctrl, Some(pred)])
    }

    pub fn new_proj(&mut self, multi: NodeId, index: usize, label: &str) -> NodeId {
        self.alloc(NodeKind::Proj { index, label: label.to_owned() }, vec![Some(multi)])
    }

    pub fn new_region(&mut self, inputs: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Region, inputs)
    }

    pub fn new_phi(&mut self, label: String, inputs: Vec<Option<NodeId>>) -> NodeId {
        self.alloc(NodeKind::Phi { label }, inputs)
    }

    // ----- debugging -------------------------------------------------------

    /// Debug DFS over both edge directions looking for a node by raw id.
    #[must_use]
    pub fn find(&self, from: NodeId, nid: u32) -> Option<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        self.find_walk(from, nid, &mut visited)
    }

    fn find_walk(&self, n: NodeId, nid: u32, visited: &mut [bool]) -> Option<NodeId> {
        if n.raw() == nid {
            return Some(n);
        }
        if visited[n.index()] {
            return None;
        }
        visited[n.index()] = true;
        for &def in self.node(n).inputs() {
            if let Some(def) = def {
                if let Some(found) = self.find_walk(def, nid, visited) {
                    return Some(found);
                }
            }
        }
        for i in 0..self.node(n).outputs().len() {
            if let Some(user) = self.node(n).outputs()[i] {
                if let Some(found) = self.find_walk(user, nid, visited) {
                    return Some(found);
                }
            }
        }
        None
    }
}
