// src/son/node.rs
//! Node envelope and the tagged node kinds.
//!
//! All node kinds share one header (id, inputs, outputs, cached type) and a
//! [`NodeKind`] tag; behavior is dispatched by matching on the tag rather
//! than through trait objects, which keeps the peephole driver generic and
//! the arena flat.
use crate::son::graph::SonGraph;
use crate::son::types::Type;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

/// Stable arena index of a node. Ids are assigned in creation order
/// starting at 1 and never reused; the expression canonicalizer relies on
/// this ordering for deterministic tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// The raw 1-based id, as shown in printed graphs.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The variant tag of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Carries an immutable constant type; its single input is Start.
    Constant(Type),
    /// Multi-valued graph entry; the payload is its `(Ctrl, arg)` tuple type.
    Start(Type),
    /// `(ctrl, expr)`; collected into Stop.
    Return,
    /// Graph root over all returns.
    Stop,
    Add,
    Sub,
    Mul,
    Div,
    Minus,
    Not,
    Eq,
    Lt,
    Le,
    /// `(ctrl, pred)`, multi-valued `(True, False)`.
    If,
    /// Extracts slot `index` of a multi-valued parent.
    Proj { index: usize, label: String },
    /// N-ary control merge; input 0 is always null.
    Region,
    /// Data merge over a Region; the label is the merged variable's name.
    Phi { label: String },
    /// Parser helper: inputs are `[ctrl, d0, d1, ...]` and `frames` maps
    /// names to input indices, innermost frame last.
    Scope { frames: Vec<HashMap<String, usize>> },
}

impl NodeKind {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Constant(t) => format!("#{t}"),
            Self::Start(_) => "Start".to_owned(),
            Self::Return => "Return".to_owned(),
            Self::Stop => "Stop".to_owned(),
            Self::Add => "Add".to_owned(),
            Self::Sub => "Sub".to_owned(),
            Self::Mul => "Mul".to_owned(),
            Self::Div => "Div".to_owned(),
            Self::Minus => "Minus".to_owned(),
            Self::Not => "Not".to_owned(),
            Self::Eq => "EQ".to_owned(),
            Self::Lt => "LT".to_owned(),
            Self::Le => "LE".to_owned(),
            Self::If => "If".to_owned(),
            Self::Proj { label, .. } => label.clone(),
            Self::Region => "Region".to_owned(),
            Self::Phi { label } => format!("Phi_{label}"),
            Self::Scope { .. } => "Scope".to_owned(),
        }
    }

    /// Compact label for Graphviz output.
    #[must_use]
    pub fn glabel(&self) -> String {
        match self {
            Self::Add => "+".to_owned(),
            Self::Sub | Self::Minus => "-".to_owned(),
            Self::Mul => "*".to_owned(),
            Self::Div => "//".to_owned(),
            Self::Not => "!".to_owned(),
            Self::Eq => "==".to_owned(),
            Self::Lt => "<".to_owned(),
            Self::Le => "<=".to_owned(),
            Self::Phi { label } => format!("&phi;_{label}"),
            other => other.label(),
        }
    }

    /// The infix symbol used when printing expressions, for binary data ops.
    #[must_use]
    pub const fn infix(&self) -> Option<&'static str> {
        match self {
            Self::Add => Some("+"),
            Self::Sub => Some("-"),
            Self::Mul => Some("*"),
            Self::Div => Some("/"),
            Self::Eq => Some("=="),
            Self::Lt => Some("<"),
            Self::Le => Some("<="),
            _ => None,
        }
    }
}

/// A node in the arena. Inputs are ordered and may contain null
/// placeholders (input 0 of an arithmetic node is reserved for control);
/// outputs are an unordered multiset of users, where a `None` entry is a
/// keep-alive sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) inputs: Vec<Option<NodeId>>,
    pub(crate) outputs: Vec<Option<NodeId>>,
    pub(crate) ty: Option<Type>,
}

impl Node {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub const fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn input(&self, i: usize) -> Option<NodeId> {
        self.inputs.get(i).copied().flatten()
    }

    #[must_use]
    pub fn inputs(&self) -> &[Option<NodeId>] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Option<NodeId>] {
        &self.outputs
    }

    #[must_use]
    pub fn is_unused(&self) -> bool {
        self.outputs.is_empty()
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.is_unused() && self.inputs.is_empty() && self.ty.is_none()
    }

    #[must_use]
    pub fn unique_name(&self) -> String {
        match self.kind {
            NodeKind::Constant(_) => format!("Con_{}", self.id),
            _ => format!("{}{}", self.kind.label(), self.id),
        }
    }
}

impl SonGraph {
    /// Prints the expression rooted at `n` the way the language writes it.
    #[must_use]
    pub fn print(&self, n: NodeId) -> String {
        let mut out = String::new();
        self.print_node(Some(n), &mut out);
        out
    }

    pub(crate) fn print_node(&self, n: Option<NodeId>, out: &mut String) {
        let Some(id) = n else {
            out.push_str("null");
            return;
        };
        let node = self.node(id);
        if node.is_dead() {
            let _ = write!(out, "{}:DEAD", node.unique_name());
            return;
        }
        match &node.kind {
            NodeKind::Constant(t) => {
                let _ = write!(out, "{t}");
            }
            NodeKind::Start(_) => out.push_str("Start"),
            NodeKind::Return => {
                out.push_str("return ");
                self.print_node(node.input(1), out);
                out.push(';');
            }
            NodeKind::Stop => {
                if node.num_inputs() == 1 {
                    self.print_node(node.input(0), out);
                } else {
                    out.push_str("Stop[ ");
                    for &ret in node.inputs() {
                        self.print_node(ret, out);
                        out.push(' ');
                    }
                    out.push(']');
                }
            }
            NodeKind::Minus => {
                out.push_str("(-");
                self.print_node(node.input(1), out);
                out.push(')');
            }
            NodeKind::Not => {
                out.push_str("(!");
                self.print_node(node.input(1), out);
                out.push(')');
            }
            NodeKind::If => {
                out.push_str("if( ");
                self.print_node(node.input(1), out);
                out.push_str(" )");
            }
            NodeKind::Proj { label, .. } => out.push_str(label),
            NodeKind::Region => {
                let _ = write!(out, "Region{}", node.id);
            }
            NodeKind::Phi { .. } => {
                out.push_str("Phi(");
                for (i, &input) in node.inputs().iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.print_node(input, out);
                }
                out.push(')');
            }
            NodeKind::Scope { frames } => {
                out.push_str("Scope");
                for frame in frames {
                    let mut names: Vec<(&usize, &String)> =
                        frame.iter().map(|(name, idx)| (idx, name)).collect();
                    names.sort();
                    out.push('[');
                    for (i, (&idx, name)) in names.into_iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        let _ = write!(out, "{name}:");
                        self.print_node(node.input(idx), out);
                    }
                    out.push(']');
                }
            }
            kind => {
                // Binary data ops print as parenthesized infix.
                if let Some(op) = kind.infix() {
                    out.push('(');
                    self.print_node(node.input(1), out);
                    out.push_str(op);
                    self.print_node(node.input(2), out);
                    out.push(')');
                }
            }
        }
    }
}
