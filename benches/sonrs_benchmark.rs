use criterion::{Criterion, criterion_group, criterion_main};
use sonrs::parser::son_parser::SonParser;
use std::hint::black_box;

const BRANCHY: &str = "
int a=arg+1;
int b=arg+2;
if( arg==1 )
    b=b+a;
else
    a=b+1;
if( a==b )
    a=a+b;
return a+b;
";

fn parse_and_print(source: &str) -> String {
    SonParser::new("bench.smp", source)
        .unwrap()
        .parse()
        .unwrap()
        .print()
}

fn spine(n: usize) -> String {
    let mut source = String::from("return 0");
    for i in 0..n {
        source.push_str(&format!("+arg+{i}"));
    }
    source.push(';');
    source
}

fn sonrs_benchmark(c: &mut Criterion) {
    c.bench_function("fold_constants", |b| {
        b.iter(|| parse_and_print(black_box("return 1+2*3+-5;")));
    });
    c.bench_function("if_else_phis", |b| {
        b.iter(|| parse_and_print(black_box(BRANCHY)));
    });
    let long_spine = spine(64);
    c.bench_function("spine_64", |b| {
        b.iter(|| parse_and_print(black_box(&long_spine)));
    });
}

criterion_group!(benches, sonrs_benchmark);
criterion_main!(benches);
