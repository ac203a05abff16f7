// src/printers/dot_printer.rs
//! Graphviz rendering of the node graph.
//!
//! A read-only consumer: it walks the graph over both edge directions from
//! Start and from the active scopes, then emits one cluster with the nodes
//! (multi-valued nodes as tables with their projections docked underneath),
//! one cluster per scope frame, and finally the def/use and scope binding
//! edges. Feed the output to `dot -Tsvg`.
use crate::son::graph::SonGraph;
use crate::son::node::{Node, NodeId, NodeKind};
use std::fmt::Write as _;

/// Renders the reachable graph plus the given scopes as a dot digraph; the
/// source text rides along in a comment.
#[must_use]
pub fn generate_dot(graph: &SonGraph, scopes: &[NodeId], source: &str) -> String {
    let all = find_all(graph, scopes);
    let mut out = String::new();
    out.push_str("digraph simple {\n");
    let _ = writeln!(out, "/*\n{source}\n*/");

    // Keep the scopes in their own cluster below the graph, pointing up
    // into the node cluster; crossing cluster borders confuses dot.
    out.push_str("\trankdir=BT;\n");
    out.push_str("\tordering=\"in\";\n");
    out.push_str("\tconcentrate=\"true\";\n");

    nodes_cluster(graph, &all, &mut out);
    for &scope in scopes {
        scope_clusters(graph, scope, &mut out);
    }
    node_edges(graph, &all, &mut out);
    for &scope in scopes {
        scope_edges(graph, scope, &mut out);
    }

    out.push_str("}\n");
    out
}

fn nodes_cluster(graph: &SonGraph, all: &[NodeId], out: &mut String) {
    out.push_str("\tsubgraph cluster_Nodes {\n");
    for &id in all {
        let node = graph.node(id);
        // Projections dock into their parent's table; scopes get their own
        // clusters below
        if matches!(node.kind(), NodeKind::Proj { .. } | NodeKind::Scope { .. }) {
            continue;
        }
        let _ = write!(out, "\t\t{} [ ", node.unique_name());
        if matches!(node.kind(), NodeKind::Start(_) | NodeKind::If) {
            multi_node_table(graph, node, out);
        } else {
            if graph.is_cfg(id) {
                out.push_str("shape=box style=filled fillcolor=yellow ");
            }
            if matches!(node.kind(), NodeKind::Phi { .. }) {
                out.push_str("style=filled fillcolor=lightyellow ");
            }
            let _ = write!(out, "label=\"{}\"", node.kind().glabel());
        }
        out.push_str("];\n");
    }

    // Line each Region up with its phis
    for &id in all {
        if !matches!(graph.kind(id), NodeKind::Region) {
            continue;
        }
        let node = graph.node(id);
        let _ = write!(out, "\t\t{{ rank=same; {};", node.unique_name());
        for &user in node.outputs().iter().flatten() {
            if matches!(graph.kind(user), NodeKind::Phi { .. }) {
                let _ = write!(out, "{};", graph.node(user).unique_name());
            }
        }
        out.push_str("}\n");
    }

    out.push_str("\t}\n");
}

/// A multi-valued node renders as a two-row table: the node on top, its
/// projections on the bottom row, each in a port named after its index.
fn multi_node_table(graph: &SonGraph, node: &Node, out: &mut String) {
    out.push_str("shape=plaintext label=<\n");
    out.push_str("\t\t\t<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">\n");
    let _ = writeln!(out, "\t\t\t<TR><TD BGCOLOR=\"yellow\">{}</TD></TR>", node.kind().glabel());
    out.push_str("\t\t\t<TR>");
    let mut projections = false;
    for &user in node.outputs().iter().flatten() {
        let user_node = graph.node(user);
        if let NodeKind::Proj { index, .. } = user_node.kind() {
            if !projections {
                projections = true;
                out.push_str("<TD>\n");
                out.push_str("\t\t\t\t<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">\n");
                out.push_str("\t\t\t\t<TR>");
            }
            let _ = write!(out, "<TD PORT=\"p{index}\"");
            if graph.is_cfg(user) {
                out.push_str(" BGCOLOR=\"yellow\"");
            }
            let _ = write!(out, ">{}</TD>", user_node.kind().glabel());
        }
    }
    if projections {
        out.push_str("</TR>\n");
        out.push_str("\t\t\t\t</TABLE>\n");
        out.push_str("\t\t\t</TD>");
    }
    out.push_str("</TR>\n");
    out.push_str("\t\t\t</TABLE>>\n\t\t");
}

fn scope_clusters(graph: &SonGraph, scope: NodeId, out: &mut String) {
    let NodeKind::Scope { frames } = graph.kind(scope) else { return };
    out.push_str("\tnode [shape=plaintext];\n");
    let scope_node = graph.node(scope);
    for (level, frame) in frames.iter().enumerate() {
        let scope_name = scope_level_name(scope_node, level);
        let _ = writeln!(out, "\tsubgraph cluster_{scope_name} {{");
        let _ = writeln!(out, "\t\t{scope_name} [label=<");
        out.push_str("\t\t\t<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">\n");
        let _ = write!(out, "\t\t\t<TR><TD BGCOLOR=\"cyan\">{level}</TD>");
        let mut names: Vec<(&usize, &String)> = frame.iter().map(|(n, i)| (i, n)).collect();
        names.sort();
        for (_, name) in names {
            let _ = write!(out, "<TD PORT=\"{}\">{name}</TD>", port_name(&scope_name, name));
        }
        out.push_str("</TR>\n");
        out.push_str("\t\t\t</TABLE>>];\n");
    }
    out.push_str(&"\t}".repeat(frames.len()));
    out.push('\n');
}

fn node_edges(graph: &SonGraph, all: &[NodeId], out: &mut String) {
    out.push_str("\tedge [ fontname=Helvetica, fontsize=8 ];\n");
    for &id in all {
        let node = graph.node(id);
        // Constant->Start edges are noise, projections are drawn as table
        // ports, scope edges come separately
        if matches!(
            node.kind(),
            NodeKind::Constant(_) | NodeKind::Proj { .. } | NodeKind::Scope { .. }
        ) {
            continue;
        }
        for (i, &def) in node.inputs().iter().enumerate() {
            let Some(def) = def else { continue };
            let phi_to_region = matches!(node.kind(), NodeKind::Phi { .. })
                && matches!(graph.kind(def), NodeKind::Region);
            if phi_to_region {
                let _ = writeln!(
                    out,
                    "\t{} -> {} [style=dotted taillabel={i}];",
                    node.unique_name(),
                    graph.node(def).unique_name()
                );
                continue;
            }
            let _ = write!(out, "\t{} -> {}", node.unique_name(), edge_target(graph, def));
            let _ = write!(out, "[taillabel={i}");
            if graph.is_cfg(def) {
                out.push_str(" color=red");
            }
            out.push_str("];\n");
        }
    }
}

fn scope_edges(graph: &SonGraph, scope: NodeId, out: &mut String) {
    let NodeKind::Scope { frames } = graph.kind(scope) else { return };
    out.push_str("\tedge [style=dashed color=cornflowerblue];\n");
    let scope_node = graph.node(scope);
    for (level, frame) in frames.iter().enumerate() {
        let scope_name = scope_level_name(scope_node, level);
        let mut names: Vec<(&usize, &String)> = frame.iter().map(|(n, i)| (i, n)).collect();
        names.sort();
        for (&index, name) in names {
            let Some(def) = scope_node.input(index) else { continue };
            let _ = writeln!(
                out,
                "\t{scope_name}:\"{}\" -> {};",
                port_name(&scope_name, name),
                edge_target(graph, def)
            );
        }
    }
}

/// A projection is addressed as a port of its parent table; everything
/// else by name.
fn edge_target(graph: &SonGraph, def: NodeId) -> String {
    match graph.kind(def) {
        NodeKind::Proj { index, .. } => {
            let parent = graph
                .input(def, 0)
                .map_or_else(|| "?".to_owned(), |p| graph.node(p).unique_name());
            format!("{parent}:p{index}")
        }
        _ => graph.node(def).unique_name(),
    }
}

fn scope_level_name(scope: &Node, level: usize) -> String {
    format!("{}_{level}", scope.unique_name())
}

fn port_name(scope_name: &str, var_name: &str) -> String {
    format!("{scope_name}_{var_name}")
}

/// Every node reachable from Start or from a scope binding, walking inputs
/// and outputs alike, in id order.
fn find_all(graph: &SonGraph, scopes: &[NodeId]) -> Vec<NodeId> {
    let mut visited = vec![false; graph.num_nodes()];
    let start = graph.start();
    for &user in graph.node(start).outputs().iter().flatten() {
        walk(graph, user, &mut visited);
    }
    for &scope in scopes {
        for i in 0..graph.num_inputs(scope) {
            if let Some(def) = graph.input(scope, i) {
                walk(graph, def, &mut visited);
            }
        }
    }
    (0..graph.num_nodes())
        .filter(|&index| visited[index])
        .map(NodeId::from_index)
        .collect()
}

fn walk(graph: &SonGraph, n: NodeId, visited: &mut [bool]) {
    if visited[n.index()] || graph.is_dead(n) {
        return;
    }
    visited[n.index()] = true;
    for &def in graph.node(n).inputs().iter().flatten() {
        walk(graph, def, visited);
    }
    for &user in graph.node(n).outputs().iter().flatten() {
        walk(graph, user, visited);
    }
}
