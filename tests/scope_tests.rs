use sonrs::son::graph::SonGraph;
use sonrs::son::node::NodeKind;
use sonrs::son::scope::CTRL;
use sonrs::son::types::{Int, Type};

fn new_graph() -> SonGraph {
    SonGraph::new(Type::Int(Int::Bot))
}

#[test]
fn define_then_lookup() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let one = graph.new_constant(Type::int(1));
    assert!(graph.scope_define(scope, "a", one));
    assert_eq!(graph.scope_lookup(scope, "a"), Some(one));
    assert_eq!(graph.scope_lookup(scope, "b"), None);
}

#[test]
fn redefinition_in_the_same_frame_fails() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let one = graph.new_constant(Type::int(1));
    let two = graph.new_constant(Type::int(2));
    assert!(graph.scope_define(scope, "a", one));
    assert!(!graph.scope_define(scope, "a", two));
}

#[test]
fn inner_frames_shadow_and_pop_restores() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let one = graph.new_constant(Type::int(1));
    graph.scope_define(scope, "a", one);

    graph.scope_push(scope);
    let two = graph.new_constant(Type::int(2));
    graph.scope_define(scope, "a", two);
    assert_eq!(graph.scope_lookup(scope, "a"), Some(two));

    graph.scope_pop(scope);
    assert_eq!(graph.scope_lookup(scope, "a"), Some(one));
    // the shadowing definition lost its only use
    assert!(graph.is_dead(two));
}

#[test]
fn update_hits_the_innermost_binding_frame() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let one = graph.new_constant(Type::int(1));
    graph.scope_define(scope, "a", one);

    // an inner frame without its own `a` updates the outer binding
    graph.scope_push(scope);
    let two = graph.new_constant(Type::int(2));
    assert_eq!(graph.scope_update(scope, "a", two), Some(two));
    graph.scope_pop(scope);
    assert_eq!(graph.scope_lookup(scope, "a"), Some(two));
    assert!(graph.is_dead(one));
}

#[test]
fn update_of_unknown_name_fails() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let one = graph.new_constant(Type::int(1));
    assert_eq!(graph.scope_update(scope, "nope", one), None);
}

#[test]
fn ctrl_is_slot_zero() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let start = graph.start();
    let ctrl = graph.new_proj(start, 0, CTRL);
    graph.scope_define(scope, CTRL, ctrl);
    assert_eq!(graph.scope_ctrl(scope), Some(ctrl));
    graph.scope_set_ctrl(scope, None);
    assert_eq!(graph.scope_ctrl(scope), None);
}

#[test]
fn dup_shares_definitions() {
    let mut graph = new_graph();
    let scope = graph.new_scope();
    graph.scope_push(scope);
    let start = graph.start();
    let ctrl = graph.new_proj(start, 0, CTRL);
    graph.scope_define(scope, CTRL, ctrl);
    let one = graph.new_constant(Type::int(1));
    graph.scope_define(scope, "a", one);

    let dup = graph.scope_dup(scope);
    assert_eq!(graph.scope_lookup(dup, "a"), Some(one));
    // both scopes hold a use on the same definition
    let uses = graph.node(one).outputs().iter().filter(|u| u.is_some()).count();
    assert_eq!(uses, 2);
}

#[test]
fn merge_builds_phis_only_where_bindings_diverge() {
    let mut graph = new_graph();
    let start = graph.start();
    let ctrl = graph.new_proj(start, 0, CTRL);
    let ctrl = graph.peephole(ctrl);
    let pred = graph.new_proj(start, 1, "arg");
    let pred = graph.peephole(pred);
    let if_node = graph.new_if(Some(ctrl), pred);
    let if_node = graph.peephole(if_node);
    let if_true = graph.new_proj(if_node, 0, "True");
    let if_true = graph.peephole(if_true);
    let if_false = graph.new_proj(if_node, 1, "False");
    let if_false = graph.peephole(if_false);

    let scope = graph.new_scope();
    graph.scope_push(scope);
    graph.scope_define(scope, CTRL, if_true);
    let one = graph.new_constant(Type::int(1));
    let one = graph.peephole(one);
    graph.scope_define(scope, "same", one);
    let two = graph.new_constant(Type::int(2));
    let two = graph.peephole(two);
    graph.scope_define(scope, "diff", two);

    let other = graph.scope_dup(scope);
    graph.scope_set_ctrl(other, Some(if_false));
    let three = graph.new_constant(Type::int(3));
    let three = graph.peephole(three);
    graph.scope_update(other, "diff", three);

    let ndefs = graph.num_inputs(scope);
    let region = graph.scope_merge(scope, other);

    // arity is unchanged and the merged scope now sits on the region
    assert_eq!(graph.num_inputs(scope), ndefs);
    assert_eq!(graph.scope_ctrl(scope), Some(region));
    assert!(matches!(graph.kind(region), NodeKind::Region));
    assert_eq!(graph.input(region, 1), Some(if_true));
    assert_eq!(graph.input(region, 2), Some(if_false));

    // unchanged binding passes through untouched
    assert_eq!(graph.scope_lookup(scope, "same"), Some(one));

    // diverging binding became a phi over both arms
    let phi = graph.scope_lookup(scope, "diff").unwrap();
    assert!(matches!(graph.kind(phi), NodeKind::Phi { .. }));
    assert_eq!(graph.input(phi, 0), Some(region));
    assert_eq!(graph.input(phi, 1), Some(two));
    assert_eq!(graph.input(phi, 2), Some(three));

    // the merged-away scope is gone
    assert!(graph.is_dead(other));
}
