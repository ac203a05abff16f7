// src/son/peephole.rs
//! Forward type computation and the peephole driver.
//!
//! `compute` is pure and reads only the cached types of a node's inputs;
//! it must never recurse into the inputs themselves, because the graph may
//! be cyclic once loops exist. `peephole` runs on every just-constructed
//! node and hands back the replacement the caller should use instead.
use crate::son::graph::SonGraph;
use crate::son::node::{NodeId, NodeKind};
use crate::son::types::{Int, Type};

impl SonGraph {
    /// Computes the type of `n` from its inputs' cached types. Monotone
    /// over the lattice.
    #[must_use]
    pub fn compute(&self, n: NodeId) -> Type {
        match self.kind(n) {
            NodeKind::Constant(t) => t.clone(),
            NodeKind::Start(args) => args.clone(),
            NodeKind::Return | NodeKind::Stop | NodeKind::Phi { .. } | NodeKind::Scope { .. } => {
                Type::Bot
            }
            NodeKind::Region => Type::Ctrl,
            NodeKind::If => Type::if_both(),
            NodeKind::Proj { index, .. } => {
                let index = *index;
                match self.input(n, 0).and_then(|multi| self.ty(multi)) {
                    Some(Type::Tuple(types)) => types.get(index).cloned().unwrap_or(Type::Bot),
                    _ => Type::Bot,
                }
            }
            NodeKind::Add => self.compute_binop(n, i64::wrapping_add),
            NodeKind::Sub => self.compute_binop(n, i64::wrapping_sub),
            NodeKind::Mul => self.compute_binop(n, i64::wrapping_mul),
            // Division by zero folds to the constant zero; this is the
            // language's semantics, not undefined behavior.
            NodeKind::Div => {
                self.compute_binop(n, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) })
            }
            NodeKind::Eq => self.compute_binop(n, |a, b| i64::from(a == b)),
            NodeKind::Lt => self.compute_binop(n, |a, b| i64::from(a < b)),
            NodeKind::Le => self.compute_binop(n, |a, b| i64::from(a <= b)),
            NodeKind::Minus => self.compute_unop(n, i64::wrapping_neg),
            NodeKind::Not => self.compute_unop(n, |v| i64::from(v == 0)),
        }
    }

    /// The cached type of input `i`, or `Bot` when the slot is null.
    pub(crate) fn input_ty(&self, n: NodeId, i: usize) -> Type {
        self.input(n, i)
            .and_then(|def| self.ty(def).cloned())
            .unwrap_or(Type::Bot)
    }

    fn compute_binop(&self, n: NodeId, fold: impl Fn(i64, i64) -> i64) -> Type {
        match (self.input_ty(n, 1), self.input_ty(n, 2)) {
            (Type::Int(a), Type::Int(b)) => match (a, b) {
                (Int::Constant(x), Int::Constant(y)) => Type::int(fold(x, y)),
                _ => Type::Int(a.meet(b)),
            },
            _ => Type::Bot,
        }
    }

    fn compute_unop(&self, n: NodeId, fold: impl Fn(i64) -> i64) -> Type {
        match self.input_ty(n, 1) {
            Type::Int(Int::Constant(v)) => Type::int(fold(v)),
            Type::Int(i) => Type::Int(i),
            _ => Type::Bot,
        }
    }

    /// Optimizes a just-constructed node, returning the node the caller
    /// should use in its place.
    ///
    /// The steps, in order: cache the computed type; in observation mode
    /// stop there; replace any non-constant node whose type identifies a
    /// single value with a `Constant`; otherwise ask `idealize` for a
    /// better-shaped replacement and recursively peephole it. Each
    /// idealization strictly removes some feature, so the recursion
    /// terminates.
    pub fn peephole(&mut self, n: NodeId) -> NodeId {
        let ty = self.compute(n);
        self.node_mut(n).ty = Some(ty.clone());

        if self.peephole_disabled() {
            return n;
        }

        if !matches!(self.kind(n), NodeKind::Constant(_)) && ty.is_constant() {
            let constant = self.new_constant(ty);
            let constant = self.peephole(constant);
            return self.dead_code_elim(n, constant);
        }

        if let Some(better) = self.idealize(n) {
            let better = self.peephole(better);
            return self.dead_code_elim(n, better);
        }

        n
    }

    /// Replaces `old` by `new`: if `old` ended up unused, kill it, shielding
    /// `new` with a keep-alive sentinel so the transitive kill of `old`'s
    /// inputs cannot eat it.
    fn dead_code_elim(&mut self, old: NodeId, new: NodeId) -> NodeId {
        if new != old && self.is_unused(old) {
            self.keep(new);
            self.kill(old);
            self.unkeep(new);
        }
        new
    }
}
