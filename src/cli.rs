// src/cli.rs
use clap::{
    Parser, ValueHint,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use std::path::PathBuf;

const HELP_STR: &str = r#"
{before-help}{name} {version}

{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"#;

// Custom styles for clap
pub fn custom_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightMagenta.on_default() | Effects::BOLD)
        .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
        .valid(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .invalid(AnsiColor::BrightYellow.on_default() | Effects::BOLD | Effects::UNDERLINE)
        .placeholder(AnsiColor::BrightBlue.on_default())
        .usage(AnsiColor::BrightCyan.on_default() | Effects::BOLD | Effects::UNDERLINE)
}

// Custom parser to enforce the .smp extension
fn parse_smp_file(s: &str) -> Result<PathBuf, String> {
    let p = PathBuf::from(s);
    let is_smp = p.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("smp")).unwrap_or(false);
    if is_smp {
        Ok(p)
    } else {
        Err("expected a path to a .smp file".into())
    }
}

#[derive(Parser, Debug)]
#[command(
    version = clap::crate_version!(),
    about,
    long_about = None,
    help_template = HELP_STR,
    styles = custom_styles()
)]
pub struct Args {
    /// Input file for compilation (a .smp file is required)
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        value_parser = parse_smp_file
    )]
    pub input: PathBuf,

    /// Seed the start argument `arg` with a constant instead of an
    /// unconstrained integer
    #[arg(long, value_name = "INT")]
    pub arg: Option<i64>,

    /// Build the graph without peephole rewriting (observation mode)
    #[arg(long)]
    pub no_peephole: bool,

    /// Write the final graph, and any #showGraph snapshots, as Graphviz
    /// dot next to this path
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub emit_dot: Option<PathBuf>,

    /// Print per-phase timings to stderr
    #[arg(long)]
    pub timings: bool,
}
