use sonrs::parser::son_parser::SonParser;

fn printed(source: &str) -> String {
    SonParser::new("test.smp", source).unwrap().parse().unwrap().print()
}

/// Region labels carry node ids; redact them so snapshots survive
/// unrelated graph-shape changes.
macro_rules! assert_graph_snapshot {
    ($value:expr, @$snapshot:literal) => {
        insta::with_settings!({filters => vec![(r"Region\d+", "Region[id]")]}, {
            insta::assert_snapshot!($value, @$snapshot);
        });
    };
}

#[test]
fn straight_line_fold() {
    assert_graph_snapshot!(printed("return 1+2*3+-5;"), @"return 2;");
}

#[test]
fn symbolic_spine() {
    assert_graph_snapshot!(printed("return 1+arg+2;"), @"return (arg+3);");
}

#[test]
fn if_else_phi() {
    assert_graph_snapshot!(
        printed("int a=1; if (arg==1) a=arg+2; else a=arg-3; return a;"),
        @"return Phi(Region[id],(arg+2),(arg-3));"
    );
}

#[test]
fn double_return() {
    assert_graph_snapshot!(
        printed("if( arg==1 ) return 3; else return 4;"),
        @"Stop[ return 3; return 4; ]"
    );
}

#[test]
fn phi_hoisting_and_constant_push() {
    assert_graph_snapshot!(
        printed("int a=arg+1; int b=0; if( arg==1 ) b=a; else b=a+1; return a+b;"),
        @"return ((arg*2)+Phi(Region[id],2,3));"
    );
}

#[test]
fn mixed_phi_spine() {
    assert_graph_snapshot!(
        printed("int a=arg+1; int b=arg+2; if( arg==1 ) b=b+a; else a=b+1; return a+b;"),
        @"return ((Phi(Region[id],(arg*2),arg)+arg)+Phi(Region[id],4,5));"
    );
}
