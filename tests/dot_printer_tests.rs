use sonrs::parser::son_parser::SonParser;
use sonrs::printers::dot_printer;

fn dot_of(source: &str) -> String {
    let program = SonParser::new("test.smp", source).unwrap().parse().unwrap();
    dot_printer::generate_dot(&program.graph, &[], source)
}

#[test]
fn dot_output_is_a_digraph_with_a_node_cluster() {
    let dot = dot_of("return 1;");
    assert!(dot.starts_with("digraph simple {"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("subgraph cluster_Nodes {"));
    assert!(dot.contains("rankdir=BT;"));
}

#[test]
fn source_rides_along_in_a_comment() {
    let dot = dot_of("return 1+2;");
    assert!(dot.contains("/*\nreturn 1+2;\n*/"));
}

#[test]
fn start_renders_as_a_projection_table() {
    let dot = dot_of("return arg;");
    assert!(dot.contains("<TABLE"));
    // the control projection is highlighted as CFG
    assert!(dot.contains("BGCOLOR=\"yellow\""));
    assert!(dot.contains("PORT=\"p0\""));
    assert!(dot.contains("PORT=\"p1\""));
}

#[test]
fn control_edges_are_red() {
    let dot = dot_of("return arg;");
    assert!(dot.contains("color=red"));
}

#[test]
fn phis_and_regions_render() {
    let dot = dot_of("int a=1; if (arg==1) a=arg+2; else a=arg-3; return a;");
    assert!(dot.contains("fillcolor=lightyellow"));
    assert!(dot.contains("Region"));
    assert!(dot.contains("style=dotted"));
    assert!(dot.contains("rank=same"));
}

#[test]
fn mid_parse_snapshot_includes_scopes() {
    let program = SonParser::new("test.smp", "int a=1; #showGraph; return a;")
        .unwrap()
        .parse()
        .unwrap();
    let snapshot = &program.dot_snapshots[0];
    assert!(snapshot.contains("subgraph cluster_Scope"));
    assert!(snapshot.contains("BGCOLOR=\"cyan\""));
    // dashed edges tie scope bindings to their nodes
    assert!(snapshot.contains("style=dashed color=cornflowerblue"));
    assert!(snapshot.contains("$ctrl"));
}

#[test]
fn constant_to_start_edges_are_suppressed() {
    let dot = dot_of("return 1;");
    // the constant appears as a node but never as an edge source
    assert!(dot.contains("Con_"));
    assert!(dot.lines().all(|line| !line.starts_with("\tCon_")));
}
