use assert_cmd::Command;
use predicates::prelude::*;

fn sonrs() -> Command {
    Command::cargo_bin("sonrs").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn compiles_and_prints_the_return() {
    sonrs()
        .args(["-i", &fixture("fold.smp")])
        .assert()
        .success()
        .stdout("return 2;\n");
}

#[test]
fn branchy_program_prints_a_phi() {
    sonrs()
        .args(["-i", &fixture("branch.smp")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phi(Region"));
}

#[test]
fn arg_flag_specializes_the_parse() {
    sonrs()
        .args(["-i", &fixture("arg.smp"), "--arg", "2"])
        .assert()
        .success()
        .stdout("return 3;\n");
}

#[test]
fn no_peephole_keeps_the_raw_expression() {
    sonrs()
        .args(["-i", &fixture("fold.smp"), "--no-peephole"])
        .assert()
        .success()
        .stdout("return ((1+(2*3))+(-5));\n");
}

#[test]
fn lexical_errors_fail_the_build() {
    sonrs()
        .args(["-i", &fixture("leading_zero.smp")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("integer values cannot start with '0'"));
}

#[test]
fn non_smp_inputs_are_rejected() {
    sonrs()
        .args(["-i", "whatever.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".smp"));
}

#[test]
fn missing_file_reports_io_error() {
    sonrs()
        .args(["-i", "does_not_exist.smp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O"));
}

#[test]
fn timings_go_to_stderr() {
    sonrs()
        .args(["-i", &fixture("fold.smp"), "--timings"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse:"));
}

#[test]
fn emit_dot_writes_the_graph() {
    let dot_path = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("fold.dot");
    sonrs()
        .args(["-i", &fixture("fold.smp"), "--emit-dot"])
        .arg(&dot_path)
        .assert()
        .success();
    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.starts_with("digraph simple {"));
}
