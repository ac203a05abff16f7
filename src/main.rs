// src/main.rs
use clap::Parser as ClapParser;
use console::style;
use sonrs::cli::Args;
use sonrs::error::error_reporter::ErrorReporter;
use sonrs::location::line_tracker::LineTracker;
use sonrs::parser::son_parser::SonParser;
use sonrs::printers::dot_printer;
use sonrs::son::types::Type;
use sonrs::time::Timer;
use std::fs;
use std::process::ExitCode;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> ExitCode {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = Args::parse();

    let source = match fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{} {}: {}", style("ERROR:").red().bold(), style("I/O").red(), style(e).yellow());
            return ExitCode::FAILURE;
        }
    };
    let file_path = args.input.to_string_lossy();

    let timer = Timer::new("parse");
    let program = build(&file_path, &source, &args);
    let program = match program {
        Ok(program) => program,
        Err(error) => {
            let reporter = ErrorReporter::new(LineTracker::new(&file_path, source));
            reporter.report(&error);
            return ExitCode::FAILURE;
        }
    };
    if args.timings {
        eprintln!("{timer}");
    }

    println!("{}", program.print());

    if let Some(dot_path) = &args.emit_dot {
        let dot = dot_printer::generate_dot(&program.graph, &[], &source);
        if let Err(e) = write_dot_outputs(dot_path, &dot, &program.dot_snapshots) {
            eprintln!("{} {}: {}", style("ERROR:").red().bold(), style("I/O").red(), style(e).yellow());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn build(
    file_path: &str,
    source: &str,
    args: &Args,
) -> Result<sonrs::parser::son_parser::ParsedProgram, sonrs::error::parse_error::ParseError> {
    let mut parser = match args.arg {
        Some(value) => SonParser::with_arg(file_path, source, Type::int(value))?,
        None => SonParser::new(file_path, source)?,
    };
    if args.no_peephole {
        parser.disable_peephole();
    }
    parser.parse()
}

/// Writes the final graph to `path`; `#showGraph` snapshots land next to it
/// with a numbered suffix.
fn write_dot_outputs(
    path: &std::path::Path,
    final_dot: &str,
    snapshots: &[String],
) -> std::io::Result<()> {
    fs::write(path, final_dot)?;
    for (i, snapshot) in snapshots.iter().enumerate() {
        let mut snapshot_path = path.to_path_buf();
        snapshot_path.set_extension(format!("{}.dot", i + 1));
        fs::write(snapshot_path, snapshot)?;
    }
    Ok(())
}
