// src/son/idealize.rs
//! Rewrites nodes into canonical shapes.
//!
//! `idealize` returns `None` for no progress, or a replacement node (which
//! may be the node itself after an in-place change). Nodes created here and
//! not directly returned are peepholed before use; the returned node is
//! peepholed by the driver. Every rule strictly removes a feature — a
//! smaller node count, a flatter right side, or a lower spine sort key — so
//! the peephole loop always terminates.
//!
//! The canonical form for sums is a left-leaning spine with constants
//! rightmost: phis of constants order just before the constants so they can
//! fold through, other phis order leftmost, and remaining ties break by
//! node id.
use crate::son::graph::SonGraph;
use crate::son::node::{NodeId, NodeKind};
use crate::son::types::Type;
use std::mem::discriminant;

impl SonGraph {
    pub(crate) fn idealize(&mut self, n: NodeId) -> Option<NodeId> {
        match self.kind(n) {
            NodeKind::Add => self.idealize_add(n),
            NodeKind::Mul => self.idealize_mul(n),
            NodeKind::Eq | NodeKind::Lt | NodeKind::Le => self.idealize_cmp(n),
            NodeKind::Phi { .. } => self.idealize_phi(n),
            _ => None,
        }
    }

    fn idealize_add(&mut self, n: NodeId) -> Option<NodeId> {
        let lhs = self.input(n, 1)?;
        let rhs = self.input(n, 2)?;
        let t2 = self.input_ty(n, 2);

        // x + 0. (0 + x) needs no rule of its own; the constant has already
        // been moved to the right.
        if t2 == Type::ZERO {
            return Some(lhs);
        }

        // x + x becomes x * 2
        if lhs == rhs {
            let two = self.new_constant(Type::int(2));
            let two = self.peephole(two);
            return Some(self.new_binary(NodeKind::Mul, lhs, two));
        }

        let lhs_is_add = self.is_add(lhs);
        let rhs_is_add = self.is_add(rhs);

        // Move the Add to the left: (non + add) becomes (add + non)
        if !lhs_is_add && rhs_is_add {
            self.swap_inputs(n);
            return Some(n);
        }

        // Rotate x+(y+z) into (x+y)+z so the spine stays left-leaning
        if rhs_is_add {
            let y = self.input(rhs, 1)?;
            let z = self.input(rhs, 2)?;
            let inner = self.new_binary(NodeKind::Add, lhs, y);
            let inner = self.peephole(inner);
            return Some(self.new_binary(NodeKind::Add, inner, z));
        }

        // Fuse (x + c1) + c2 into x + (c1 + c2); the inner add folds
        if lhs_is_add && t2.is_constant() {
            let c1 = self.input(lhs, 2)?;
            if self.ty(c1).is_some_and(Type::is_constant) {
                let x = self.input(lhs, 1)?;
                let folded = self.new_binary(NodeKind::Add, c1, rhs);
                let folded = self.peephole(folded);
                return Some(self.new_binary(NodeKind::Add, x, folded));
            }
        }

        // Push a constant up through a phi of constants:
        // (x + Phi(c0, c1)) + c  becomes  x + Phi(c0+c, c1+c)
        if let Some(pushed) = self.phi_con(n, true) {
            return Some(pushed);
        }

        if lhs_is_add {
            // Sort along the spine: rotate (x+y)+z into (x+z)+y when z
            // orders before y
            let y = self.input(lhs, 2)?;
            if self.spine_cmp(y, rhs) {
                let x = self.input(lhs, 1)?;
                let inner = self.new_binary(NodeKind::Add, x, rhs);
                let inner = self.peephole(inner);
                return Some(self.new_binary(NodeKind::Add, inner, y));
            }
            return None;
        }

        // Two off-spine leaves; order them
        if self.spine_cmp(lhs, rhs) {
            self.swap_inputs(n);
            return Some(n);
        }
        None
    }

    fn idealize_mul(&mut self, n: NodeId) -> Option<NodeId> {
        let lhs = self.input(n, 1)?;
        let t1 = self.input_ty(n, 1);
        let t2 = self.input_ty(n, 2);

        // x * 1
        if t2 == Type::int(1) {
            return Some(lhs);
        }

        // Constants to the right: con*x becomes x*con
        if t1.is_constant() && !t2.is_constant() {
            self.swap_inputs(n);
            return Some(n);
        }
        None
    }

    /// Compares of a value against itself fold to the operator's reflexive
    /// result.
    fn idealize_cmp(&mut self, n: NodeId) -> Option<NodeId> {
        if self.input(n, 1) == self.input(n, 2) {
            let value = match self.kind(n) {
                NodeKind::Lt => 0,
                _ => 1,
            };
            return Some(self.new_constant(Type::int(value)));
        }
        None
    }

    fn idealize_phi(&mut self, n: NodeId) -> Option<NodeId> {
        // Phi(x, x) is just x
        if self.phi_same_inputs(n) {
            return self.input(n, 1);
        }

        // Phi(op(A, B), op(Q, R)) becomes op(Phi(A, Q), Phi(B, R)); fewer
        // ops, and phis cost nothing downstream
        let op = self.input(n, 1)?;
        if self.num_inputs(op) == 3
            && self.input(op, 0).is_none()
            && !self.is_cfg(op)
            && self.phi_same_op(n)
        {
            let n_ins = self.num_inputs(n);
            let region = self.input(n, 0);
            let mut lhss: Vec<Option<NodeId>> = Vec::with_capacity(n_ins);
            let mut rhss: Vec<Option<NodeId>> = Vec::with_capacity(n_ins);
            lhss.push(region);
            rhss.push(region);
            for i in 1..n_ins {
                let op_i = self.input(n, i)?;
                lhss.push(self.input(op_i, 1));
                rhss.push(self.input(op_i, 2));
            }
            let label = self.phi_label(n)?;
            let op_kind = self.kind(op).clone();
            let phi_lhs = self.new_phi(label.clone(), lhss);
            let phi_lhs = self.peephole(phi_lhs);
            let phi_rhs = self.new_phi(label, rhss);
            let phi_rhs = self.peephole(phi_rhs);
            return Some(self.new_binary(op_kind, phi_lhs, phi_rhs));
        }
        None
    }

    // ----- helpers ---------------------------------------------------------

    fn is_add(&self, n: NodeId) -> bool {
        matches!(self.kind(n), NodeKind::Add)
    }

    fn phi_label(&self, n: NodeId) -> Option<String> {
        match self.kind(n) {
            NodeKind::Phi { label } => Some(label.clone()),
            _ => None,
        }
    }

    /// Swaps inputs 1 and 2 in place. The use mirror is positionless, so no
    /// edge bookkeeping is needed.
    fn swap_inputs(&mut self, n: NodeId) {
        self.node_mut(n).inputs.swap(1, 2);
    }

    /// All data inputs (skipping input 0) carry constant types.
    fn all_cons(&self, n: NodeId) -> bool {
        (1..self.num_inputs(n)).all(|i| self.input_ty(n, i).is_constant())
    }

    fn phi_same_inputs(&self, n: NodeId) -> bool {
        let first = self.input(n, 1);
        (2..self.num_inputs(n)).all(|i| self.input(n, i) == first)
    }

    fn phi_same_op(&self, n: NodeId) -> bool {
        let Some(first) = self.input(n, 1) else { return false };
        let tag = discriminant(self.kind(first));
        (2..self.num_inputs(n)).all(|i| {
            self.input(n, i)
                .is_some_and(|op| discriminant(self.kind(op)) == tag)
        })
    }

    /// Decides whether `hi` and `lo` should trade places on the spine:
    /// constants order last, then phis of constants, then other non-phis,
    /// then phis, with node-id order breaking ties. Returns true when a
    /// swap lowers the sort key.
    fn spine_cmp(&self, hi: NodeId, lo: NodeId) -> bool {
        if self.ty(lo).is_some_and(Type::is_constant) {
            return false;
        }
        if self.ty(hi).is_some_and(Type::is_constant) {
            return true;
        }

        let hi_phi = matches!(self.kind(hi), NodeKind::Phi { .. });
        let lo_phi = matches!(self.kind(lo), NodeKind::Phi { .. });
        if lo_phi && self.all_cons(lo) {
            return false;
        }
        if hi_phi && self.all_cons(hi) {
            return true;
        }
        if lo_phi && !hi_phi {
            return true;
        }
        if hi_phi && !lo_phi {
            return false;
        }

        lo > hi
    }

    /// A Phi whose data inputs are all constants, or `None`.
    fn pcon(&self, n: NodeId) -> Option<NodeId> {
        (matches!(self.kind(n), NodeKind::Phi { .. }) && self.all_cons(n)).then_some(n)
    }

    /// Pushes a constant (or a phi of constants over the same region) up
    /// through a phi of constants, folding element-wise:
    /// `Phi(c0, c1) + c` becomes `Phi(c0+c, c1+c)`. With `rotate`, the phi
    /// may also sit one level down on the left spine of a matching op.
    fn phi_con(&mut self, op: NodeId, rotate: bool) -> Option<NodeId> {
        let lhs = self.input(op, 1)?;
        let rhs = self.input(op, 2)?;

        let mut lphi = self.pcon(lhs);
        if rotate && lphi.is_none() && self.num_inputs(lhs) > 2 {
            // Rotating constants out is only valid between ops of one kind
            if discriminant(self.kind(lhs)) != discriminant(self.kind(op)) {
                return None;
            }
            lphi = self.input(lhs, 2).and_then(|l2| self.pcon(l2));
        }
        let lphi = lphi?;

        let rphi = self.pcon(rhs);
        if rphi.is_none() && !matches!(self.kind(rhs), NodeKind::Constant(_)) {
            return None;
        }
        // Two phis only combine over the same region
        if let Some(rphi) = rphi {
            if self.input(lphi, 0) != self.input(rphi, 0) {
                return None;
            }
        }

        let op_kind = self.kind(op).clone();
        let n_ins = self.num_inputs(lphi);
        let mut inputs: Vec<Option<NodeId>> = Vec::with_capacity(n_ins);
        inputs.push(self.input(lphi, 0));
        for i in 1..n_ins {
            let a = self.input(lphi, i)?;
            let b = match rphi {
                Some(rphi) => self.input(rphi, i)?,
                None => rhs,
            };
            let folded = self.new_binary(op_kind.clone(), a, b);
            let folded = self.peephole(folded);
            inputs.push(Some(folded));
        }

        let mut label = self.phi_label(lphi)?;
        if let Some(rphi) = rphi {
            label.push_str(&self.phi_label(rphi)?);
        }
        let phi = self.new_phi(label, inputs);
        let phi = self.peephole(phi);

        // After a rotate the off-spine operand must be re-attached;
        // otherwise the phi itself is the replacement.
        if lhs == lphi {
            Some(phi)
        } else {
            let x = self.input(lhs, 1)?;
            Some(self.new_binary(op_kind, x, phi))
        }
    }
}
