// src/son/scope.rs
//! Lexical scopes, stored in the graph itself.
//!
//! A Scope node's inputs are a flat definition vector `[ctrl, d0, d1, ...]`
//! paired with a stack of name-to-index frames. Keeping the scope in the
//! graph means every binding is a real use: dead values stay alive while
//! visible, and frame pops release them through the ordinary edge
//! discipline.
use crate::son::graph::SonGraph;
use crate::son::node::{NodeId, NodeKind};
use crate::son::types::Type;
use std::collections::HashMap;

/// Reserved name for the current control node. Not lexable as an
/// identifier, so programs can never reference it.
pub const CTRL: &str = "$ctrl";
/// Name of the single incoming argument.
pub const ARG0: &str = "arg";

impl SonGraph {
    pub fn new_scope(&mut self) -> NodeId {
        let scope = self.alloc(NodeKind::Scope { frames: Vec::new() }, Vec::new());
        self.node_mut(scope).ty = Some(Type::Bot);
        scope
    }

    fn frames(&self, scope: NodeId) -> &Vec<HashMap<String, usize>> {
        match self.kind(scope) {
            NodeKind::Scope { frames } => frames,
            _ => unreachable!("scope operation on a non-scope node"),
        }
    }

    fn frames_mut(&mut self, scope: NodeId) -> &mut Vec<HashMap<String, usize>> {
        match &mut self.node_mut(scope).kind {
            NodeKind::Scope { frames } => frames,
            _ => unreachable!("scope operation on a non-scope node"),
        }
    }

    /// Opens a lexical frame.
    pub fn scope_push(&mut self, scope: NodeId) {
        self.frames_mut(scope).push(HashMap::new());
    }

    /// Closes the innermost frame, releasing its definitions and killing
    /// any that become unused.
    pub fn scope_pop(&mut self, scope: NodeId) {
        let count = self.frames_mut(scope).pop().map_or(0, |frame| frame.len());
        self.pop_defs(scope, count);
    }

    /// Binds `name` in the innermost frame. Returns false on redefinition.
    pub fn scope_define(&mut self, scope: NodeId, name: &str, def: NodeId) -> bool {
        let index = self.num_inputs(scope);
        let Some(frame) = self.frames_mut(scope).last_mut() else { return false };
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_owned(), index);
        self.add_def(scope, Some(def));
        true
    }

    /// Resolves `name`, innermost frame first.
    #[must_use]
    pub fn scope_lookup(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        let index = self.scope_index_of(scope, name)?;
        self.input(scope, index)
    }

    /// Rebinds `name` to `def` in the innermost frame that knows it.
    /// Returns `None` when the name is not in scope.
    pub fn scope_update(&mut self, scope: NodeId, name: &str, def: NodeId) -> Option<NodeId> {
        let index = self.scope_index_of(scope, name)?;
        self.set_def(scope, index, Some(def));
        Some(def)
    }

    fn scope_index_of(&self, scope: NodeId, name: &str) -> Option<usize> {
        self.frames(scope)
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// The node bound to `$ctrl` (definition slot 0).
    #[must_use]
    pub fn scope_ctrl(&self, scope: NodeId) -> Option<NodeId> {
        self.input(scope, 0)
    }

    /// Rebinds `$ctrl`. Passing `None` kills the control edge, e.g. after a
    /// return.
    pub fn scope_set_ctrl(&mut self, scope: NodeId, ctrl: Option<NodeId>) {
        self.set_def(scope, 0, ctrl);
    }

    /// Clones the scope for a branching parse: the frames are copied and
    /// the duplicate registers a use on every bound definition, making it a
    /// first-class graph citizen.
    pub fn scope_dup(&mut self, scope: NodeId) -> NodeId {
        let frames = self.frames(scope).clone();
        let inputs = self.node(scope).inputs().to_vec();
        self.alloc(NodeKind::Scope { frames }, inputs)
    }

    /// Merges two scopes at a control-flow join. Both must have identical
    /// frame shapes (the builder enforces this). Creates a Region over the
    /// two controls, replaces every binding that differs with a Phi over
    /// both arms, kills `that`, and returns the Region.
    pub fn scope_merge(&mut self, this: NodeId, that: NodeId) -> NodeId {
        let this_ctrl = self.scope_ctrl(this);
        let that_ctrl = self.scope_ctrl(that);
        let region = self.new_region(vec![None, this_ctrl, that_ctrl]);
        let region = self.peephole(region);
        self.scope_set_ctrl(this, Some(region));

        let names = self.scope_reverse_names(this);
        // Slot 0 is `$ctrl`, already handled above
        for i in 1..self.num_inputs(this) {
            let a = self.input(this, i);
            let b = self.input(that, i);
            if a == b {
                continue;
            }
            let label = names[i].clone().unwrap_or_default();
            let phi = self.new_phi(label, vec![Some(region), a, b]);
            let phi = self.peephole(phi);
            self.set_def(this, i, Some(phi));
        }

        self.kill(that);
        region
    }

    /// Names of the definition vector, indexed by slot.
    #[must_use]
    pub fn scope_reverse_names(&self, scope: NodeId) -> Vec<Option<String>> {
        let mut names = vec![None; self.num_inputs(scope)];
        for frame in self.frames(scope) {
            for (name, &index) in frame {
                names[index] = Some(name.clone());
            }
        }
        names
    }
}
